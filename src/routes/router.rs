use std::collections::HashMap;
use std::fmt;

use crate::models::Viewer;
use crate::session::ViewerStore;
use crate::utils::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    /// `:name?`, matches zero or one segment.
    Optional(String),
}

/// A path pattern such as `/listings/:location?`.
///
/// Matching is exact and case-sensitive on literal segments. Empty segments
/// are ignored, so `/host/` matches `/host`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => match name.strip_suffix('?') {
                    Some(name) => Segment::Optional(name.to_string()),
                    None => Segment::Param(name.to_string()),
                },
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The decoded path parameters when `path` matches.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let mut params = HashMap::new();
        let mut index = 0;

        for segment in &self.segments {
            let part = parts.get(index).copied();
            match segment {
                Segment::Literal(literal) => {
                    if part != Some(literal.as_str()) {
                        return None;
                    }
                    index += 1;
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), decode(part?));
                    index += 1;
                }
                Segment::Optional(name) => {
                    if let Some(part) = part {
                        params.insert(name.clone(), decode(part));
                        index += 1;
                    }
                }
            }
        }

        (index == parts.len()).then_some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn decode(part: &str) -> String {
    urlencoding::decode(part)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| part.to_string())
}

/// Everything a route handler gets to see.
#[derive(Clone)]
pub struct RouteContext {
    pub path: String,
    pub params: HashMap<String, String>,
    pub query: Option<String>,
    /// Snapshot taken when the route was resolved.
    pub viewer: Viewer,
    pub viewer_store: ViewerStore,
}

impl RouteContext {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        Location {
            path: self.path.clone(),
            query: self.query.clone(),
        }
        .query_param(name)
    }
}

pub type Handler<V> = Box<dyn Fn(&RouteContext) -> V + Send + Sync>;

/// Ordered route table. The first matching pattern wins; the fallback
/// handles everything else.
pub struct Router<V> {
    routes: Vec<(RoutePattern, Handler<V>)>,
    fallback: Handler<V>,
}

impl<V> Router<V> {
    pub fn new(fallback: impl Fn(&RouteContext) -> V + Send + Sync + 'static) -> Self {
        Self {
            routes: Vec::new(),
            fallback: Box::new(fallback),
        }
    }

    pub fn route(
        mut self,
        pattern: &str,
        handler: impl Fn(&RouteContext) -> V + Send + Sync + 'static,
    ) -> Self {
        self.routes.push((RoutePattern::parse(pattern), Box::new(handler)));
        self
    }

    pub fn patterns(&self) -> impl Iterator<Item = &RoutePattern> {
        self.routes.iter().map(|(pattern, _)| pattern)
    }

    pub fn resolve(&self, location: &str, viewer_store: &ViewerStore) -> V {
        self.resolve_with(location, viewer_store.current(), viewer_store)
    }

    /// Resolve against a viewer snapshot the caller already holds.
    pub fn resolve_with(&self, location: &str, viewer: Viewer, viewer_store: &ViewerStore) -> V {
        let location = Location::parse(location);
        let mut context = RouteContext {
            path: location.path,
            params: HashMap::new(),
            query: location.query,
            viewer,
            viewer_store: viewer_store.clone(),
        };

        for (pattern, handler) in &self.routes {
            if let Some(params) = pattern.matches(&context.path) {
                tracing::trace!(pattern = %pattern, path = %context.path, "route matched");
                context.params = params;
                return handler(&context);
            }
        }
        (self.fallback)(&context)
    }
}
