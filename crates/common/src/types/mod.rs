use serde::Serialize;

/// Liveness payload returned by the health endpoint.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}
