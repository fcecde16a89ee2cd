use dual_stream_planner::{
    DualStreamPlanner, JsonFileStateStore, PersistOnChange, ServiceConfig, http_api, logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let config = ServiceConfig::from_env();

    let store = JsonFileStateStore::new(&config.state_path);
    let mut planner =
        DualStreamPlanner::restore(&store).with_scheduler_config(config.scheduler);
    planner.observe(PersistOnChange::new(store));

    println!(
        "dual-stream-planner HTTP API listening on http://{}",
        config.http_addr
    );
    http_api::serve(config.http_addr, planner).await?;
    Ok(())
}
