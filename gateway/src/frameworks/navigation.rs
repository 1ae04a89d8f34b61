use tokio::sync::mpsc;

use crate::domain::{Navigator, Route};

// Navigator that forwards redirect requests to whatever UI loop owns the receiver.
#[derive(Debug, Clone)]
pub struct RouteChannel {
    tx: mpsc::UnboundedSender<Route>,
}

impl RouteChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for RouteChannel {
    fn navigate(&self, route: Route) {
        if self.tx.send(route).is_err() {
            tracing::warn!(route = route.path(), "no ui listener for navigation request.");
        }
    }
}
