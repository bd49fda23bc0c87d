use mongodb::Client;

use crate::common::DatabaseError;

/// Check MongoDB health with a lightweight command
///
/// Useful for Kubernetes readiness and liveness probes.
pub async fn check_health(client: &Client) -> Result<(), DatabaseError> {
    client
        .list_database_names()
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("MongoDB health check failed: {}", e)))?;

    Ok(())
}
