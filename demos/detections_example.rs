/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 14/5/25
 ******************************************************************************/
use std::sync::Arc;
use tracing::{info, warn};

use wadas_client::{
    application::services::{DashboardService, DashboardServiceImpl},
    config::Config,
    constants::DEFAULT_PAGE_SIZE,
    error::ClientError,
    utils::filters::{ActuationFilter, DetectionFilter},
    utils::logger::setup_logger,
    utils::pagination::{offset_for_page, PageItem, PaginationBar},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logger();

    let config = Arc::new(Config::new());
    let service = DashboardServiceImpl::from_config(Arc::clone(&config))?;

    let auth = service.authenticator();
    if !auth.is_logged_in() {
        auth.login_with(&config.credentials).await?;
    }

    let options = match service.filter_options().await {
        Ok(options) => options,
        Err(ClientError::Unauthorized) => {
            warn!("Session expired, run login_example again");
            auth.logout();
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "{} cameras, {} known animals",
        options.cameras.len(),
        options.animals.len()
    );

    let filter = DetectionFilter {
        camera_ids: options.cameras.iter().map(|c| c.id).collect(),
        ..DetectionFilter::default()
    };

    let page_number = 1;
    let page = service
        .detections(&filter, offset_for_page(page_number, DEFAULT_PAGE_SIZE))
        .await?;
    let bar = PaginationBar::new(page_number, page.total_pages(DEFAULT_PAGE_SIZE));
    let labels: Vec<String> = bar
        .items
        .iter()
        .map(|item| match item {
            PageItem::Page { number, active: true } => format!("[{}]", number),
            PageItem::Page { number, .. } => number.to_string(),
            PageItem::Ellipsis => "...".to_string(),
        })
        .collect();
    info!("{} detections, pages: {}", page.total, labels.join(" "));

    for event in &page.data {
        let animal = event
            .top_animal()
            .map(|a| format!("{} ({}%)", a.animal, a.percentage()))
            .unwrap_or_else(|| "unclassified".to_string());
        info!("#{} camera {} at {}: {}", event.id, event.camera_id, event.timestamp, animal);

        let actuations = service
            .actuations(&ActuationFilter::for_detection(event.id), 0)
            .await?;
        for actuation in &actuations.data {
            info!("    {} -> {}", actuation.actuator.name, actuation.command);
        }
    }

    if let Some(event) = page.data.iter().find(|e| e.has_image()) {
        let image = service.detection_image(event.id).await?;
        let path = std::env::temp_dir().join(image.file_name());
        std::fs::write(&path, &image.bytes)?;
        info!("Image of event #{} saved to {}", event.id, path.display());
    }

    let export = service.export_detections(&filter).await?;
    let path = export.save_to(std::env::temp_dir())?;
    info!("Exported {} detections to {}", export.len(), path.display());

    Ok(())
}
