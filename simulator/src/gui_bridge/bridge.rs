use crate::gui_bridge::model::DisplayReading;
use navcore::{Snapshot, WindUnits};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use warp::{http::StatusCode, Filter};

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Read-only HTTP view over the latest published snapshot.
///
/// `GET /snapshot` returns the whole snapshot as JSON, `GET /display/<index>` one
/// instrument-panel slot.
#[derive(Clone)]
pub struct GuiBridge {
    snapshots: watch::Receiver<Arc<Snapshot>>,
    units: WindUnits,
}

impl GuiBridge {
    pub fn new(snapshots: watch::Receiver<Arc<Snapshot>>, units: WindUnits) -> Self {
        Self { snapshots, units }
    }

    pub fn latest(&self) -> Arc<Snapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let bridge = self.clone();
        let bridge_filter = warp::any().map(move || bridge.clone());

        let snapshot_route = warp::path("snapshot")
            .and(warp::path::end())
            .and(warp::get())
            .and(bridge_filter.clone())
            .map(|bridge: GuiBridge| warp::reply::json(&*bridge.latest()));

        let display_route = warp::path!("display" / usize)
            .and(warp::get())
            .and(bridge_filter)
            .map(|index: usize, bridge: GuiBridge| {
                match DisplayReading::from_snapshot(&bridge.latest(), index, bridge.units) {
                    Some(reading) => {
                        warp::reply::with_status(warp::reply::json(&reading), StatusCode::OK)
                    }
                    None => {
                        let error = json!({ "error": format!("no display slot {}", index) });
                        warp::reply::with_status(warp::reply::json(&error), StatusCode::NOT_FOUND)
                    }
                }
            });

        snapshot_route.or(display_route)
    }

    /// Serves the routes until the runtime shuts down.
    pub async fn serve(self, address: SocketAddr) {
        log::info!("snapshot bridge listening on http://{}", address);
        warp::serve(self.routes()).run(address).await;
    }
}
