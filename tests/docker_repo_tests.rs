// Optional DockerRepo tests when Docker daemon is available

use perfmon::docker_repo::DockerRepo;
use perfmon::sources::{ContainerSource, FetchError};

#[tokio::test]
async fn docker_repo_missing_container_is_not_found() {
    let repo = match DockerRepo::connect().await {
        Ok(r) => r,
        Err(_) => return, // Skip when Docker is not available (e.g. CI without Docker)
    };
    let err = repo
        .get_counters("perfmon-test-no-such-container")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound(name) if name == "perfmon-test-no-such-container"));
}
