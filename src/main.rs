use affil_net::algorithm::network::{
    LayoutConfig, LayoutSnapshot, build_edgelist_with_config, compute_layout,
    metrics_to_record_batch,
};
use affil_net::algorithm::temporal::{compute_all_metrics_with_config, time_windows};
use affil_net::utils::logging::{create_window_progress_bar, finish_progress_bar};
use affil_net::{AffiliationRecord, NetworkConfig, PersistenceMode, key_set, records_to_batch};
use chrono::NaiveDate;
use log::info;
use std::time::Instant;

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow::anyhow!("invalid date {y}-{m}-{d}"))
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // A small board-interlock network: two boards, one conference
    let records = vec![
        AffiliationRecord::new("alice", "board-a", date(2020, 1, 1)?, Some(date(2020, 12, 31)?)),
        AffiliationRecord::new("bob", "board-a", date(2020, 3, 1)?, None),
        AffiliationRecord::new("bob", "board-b", date(2020, 2, 1)?, Some(date(2020, 9, 30)?)),
        AffiliationRecord::new("carol", "board-b", date(2020, 1, 15)?, None),
        AffiliationRecord::new("dave", "board-b", date(2020, 6, 1)?, None),
        AffiliationRecord::new("dave", "summit", date(2020, 4, 10)?, Some(date(2020, 4, 12)?))
            .with_type("event"),
        AffiliationRecord::new("alice", "summit", date(2020, 4, 10)?, Some(date(2020, 4, 12)?))
            .with_type("event"),
    ];
    let affiliations = records_to_batch(&records)?;
    info!("Loaded {} affiliations", affiliations.num_rows());

    let config = NetworkConfig::default()
        .with_persistence(PersistenceMode::EventsOnly, 2)
        .with_parallel(true);
    info!("{config}");

    let start = date(2020, 1, 1)?;
    let end = date(2021, 1, 1)?;
    let windows = time_windows(start, end, config.timestep, config.step_policy)?;
    let progress = create_window_progress_bar(windows.len() as u64, Some("Computing windows"));
    let ticker = progress.clone();

    let on_cols = [key_set(&["Org.ID"])];
    let timer = Instant::now();
    let rows = compute_all_metrics_with_config(
        &affiliations,
        &on_cols,
        None,
        None,
        Some(start),
        Some(end),
        &config,
        Some(Box::new(move |window_start| ticker.tick(window_start))),
    )?;
    finish_progress_bar(&progress, Some("done"));
    info!("Computed {} metric rows in {:?}", rows.len(), timer.elapsed());

    let table = metrics_to_record_batch(&rows)?;
    info!(
        "Metrics table: {} rows x {} columns",
        table.num_rows(),
        table.num_columns()
    );

    for row in rows.iter().filter(|r| r.is_valid()) {
        println!("{}", serde_json::to_string(row)?);
    }

    // Lay out each window, seeding positions from the one before
    let members: Vec<String> = ["alice", "bob", "carol", "dave"]
        .iter()
        .map(|m| (*m).to_string())
        .collect();
    let layout_config = LayoutConfig::default();
    let mut snapshot = LayoutSnapshot::default();
    for window in &windows {
        let edges = build_edgelist_with_config(
            &affiliations,
            &on_cols,
            window.start,
            window.end,
            None,
            &config,
        )?;
        snapshot = compute_layout(&edges, &members, Some(&snapshot), &layout_config);
    }
    println!("{}", serde_json::to_string(&snapshot)?);

    Ok(())
}
