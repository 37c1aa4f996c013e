use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::core::{Coordinate, InstructionTrigger, Route};
use crate::error::PlaybackResult;

/// Receiving end handed to the playback engine
pub type RouteWatch = watch::Receiver<Option<Arc<Route>>>;

/// Holds the active route and tells subscribers when it is replaced
///
/// Cloning shares the same buffer, so a route search running elsewhere can
/// replace the route while the engine is playing.
#[derive(Clone)]
pub struct RouteBuffer {
    tx: Arc<watch::Sender<Option<Arc<Route>>>>,
}

impl Default for RouteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteBuffer {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Validate and install a new route, replacing the old one wholesale
    pub fn set_route(
        &self,
        coordinates: Vec<Coordinate>,
        triggers: Vec<InstructionTrigger>,
    ) -> PlaybackResult<Arc<Route>> {
        let route = Route::new(coordinates, triggers)?;
        Ok(self.replace(route))
    }

    /// Install an already validated route
    pub fn replace(&self, route: Route) -> Arc<Route> {
        info!(
            "Route set: {} points, {} instructions, {:.0} m",
            route.len(),
            route.triggers().len(),
            route.length_m()
        );
        let route = Arc::new(route);
        self.tx.send_replace(Some(route.clone()));
        route
    }

    pub fn get_route(&self) -> Option<Arc<Route>> {
        self.tx.borrow().clone()
    }

    pub fn has_route(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn clear(&self) {
        info!("Route cleared");
        self.tx.send_replace(None);
    }

    /// Watch for replacements; the current route counts as already seen
    pub fn subscribe(&self) -> RouteWatch {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;

    #[test]
    fn test_empty_buffer() {
        let buffer = RouteBuffer::new();
        assert!(buffer.get_route().is_none());
        assert!(!buffer.has_route());
    }

    #[test]
    fn test_empty_route_leaves_previous_in_place() {
        let buffer = RouteBuffer::new();
        buffer.set_route(vec![Coordinate::new(1.0, 2.0)], vec![]).unwrap();

        assert_eq!(buffer.set_route(vec![], vec![]).unwrap_err(), PlaybackError::EmptyRoute);
        assert_eq!(buffer.get_route().unwrap().start(), Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn test_nan_route_rejected() {
        let buffer = RouteBuffer::new();
        let coordinates = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(f64::NAN, 0.001),
            Coordinate::new(0.0, 0.002),
        ];
        assert_eq!(
            buffer.set_route(coordinates, vec![]).unwrap_err(),
            PlaybackError::InvalidCoordinate { position: 1 }
        );
        assert!(!buffer.has_route());
    }

    #[test]
    fn test_subscribers_see_replacement() {
        let buffer = RouteBuffer::new();
        let mut watch = buffer.subscribe();
        assert!(!watch.has_changed().unwrap());

        let shared = buffer.clone();
        shared.set_route(vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.001)], vec![]).unwrap();

        assert!(watch.has_changed().unwrap());
        let seen = watch.borrow_and_update().clone().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(!watch.has_changed().unwrap());

        buffer.clear();
        assert!(watch.has_changed().unwrap());
        assert!(watch.borrow_and_update().is_none());
    }
}
