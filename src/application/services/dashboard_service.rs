/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 13/5/25
******************************************************************************/
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::{
        client::RetryingSessionClient,
        models::{
            ActuationEvent, Camera, DataResponse, DetectionEvent, FilterOptions, ImageBlob,
            Paginated,
        },
    },
    config::Config,
    constants::{
        ACTUATIONS_ENDPOINT, ACTUATIONS_EXPORT_ENDPOINT, ACTUATION_COMMANDS_ENDPOINT,
        ACTUATOR_TYPES_ENDPOINT, ANIMALS_ENDPOINT, CAMERAS_ENDPOINT, DETECTIONS_ENDPOINT,
        DETECTIONS_EXPORT_ENDPOINT,
    },
    error::ClientError,
    session::{Authenticator, HttpTokenRefresher, SingleFlightRefresher, TokenRefresher},
    storage::{FileTokenStore, TokenStore},
    transport::{Payload, WadasHttpClient},
    utils::{
        export::ExportTable,
        filters::{ActuationFilter, DetectionFilter, QueryParams},
    },
};

/// Typed access to the dashboard endpoints.
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Enabled cameras with their actuators.
    async fn cameras(&self) -> Result<Vec<Camera>, ClientError>;

    /// Animal names the classifier has reported so far.
    async fn animals(&self) -> Result<Vec<String>, ClientError>;

    async fn actuator_types(&self) -> Result<Vec<String>, ClientError>;

    async fn actuation_commands(&self) -> Result<Vec<String>, ClientError>;

    /// One page of detection events starting at `offset`.
    async fn detections(
        &self,
        filter: &DetectionFilter,
        offset: u64,
    ) -> Result<Paginated<DetectionEvent>, ClientError>;

    /// One page of actuation events starting at `offset`.
    async fn actuations(
        &self,
        filter: &ActuationFilter,
        offset: u64,
    ) -> Result<Paginated<ActuationEvent>, ClientError>;

    /// Classification image of a detection, or the raw detection image when
    /// the event was never classified.
    async fn detection_image(&self, event_id: i64) -> Result<ImageBlob, ClientError>;

    async fn export_detections(&self, filter: &DetectionFilter)
        -> Result<ExportTable, ClientError>;

    async fn export_actuations(&self, filter: &ActuationFilter)
        -> Result<ExportTable, ClientError>;

    /// Everything the event table filters offer, loaded concurrently.
    async fn filter_options(&self) -> Result<FilterOptions, ClientError>;
}

pub struct DashboardServiceImpl {
    config: Arc<Config>,
    http: WadasHttpClient,
    store: Arc<dyn TokenStore>,
    client: RetryingSessionClient,
}

impl DashboardServiceImpl {
    /// Builds the service on top of `store`. The refresher is shared by every
    /// call and coalesces concurrent refreshes unless disabled in `config`.
    pub fn new(config: Arc<Config>, store: Arc<dyn TokenStore>) -> anyhow::Result<Self> {
        let http = WadasHttpClient::new(&config.rest_api)?;
        let timeout = config.rest_api.timeout();

        let refresher: Arc<dyn TokenRefresher> = Arc::new(HttpTokenRefresher::new(
            http.clone(),
            store.clone(),
            timeout,
        ));
        let refresher: Arc<dyn TokenRefresher> = if config.session.single_flight_refresh {
            Arc::new(SingleFlightRefresher::new(refresher))
        } else {
            refresher
        };

        let client = RetryingSessionClient::new(store.clone(), refresher, timeout);
        debug!("Dashboard service ready on {}", http.base_url());

        Ok(Self {
            config,
            http,
            store,
            client,
        })
    }

    /// Same as [`DashboardServiceImpl::new`] with tokens persisted at the
    /// configured path.
    pub fn from_config(config: Arc<Config>) -> anyhow::Result<Self> {
        let store = FileTokenStore::open(&config.storage.token_path)?;
        Self::new(config, Arc::new(store))
    }

    pub fn get_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        self.store.clone()
    }

    /// Login/logout against the same token store the service reads from.
    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(self.http.clone(), self.store.clone())
    }

    async fn fetch(&self, endpoint: &str, query: &QueryParams) -> Result<Payload, ClientError> {
        let http = &self.http;
        self.client
            .execute(|token: Option<String>| async move {
                http.get(endpoint, query, token.as_deref()).await
            })
            .await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &QueryParams,
    ) -> Result<T, ClientError> {
        let payload = self.fetch(endpoint, query).await?;
        Ok(payload.json::<T>()?)
    }

    async fn fetch_list(&self, endpoint: &str) -> Result<Vec<String>, ClientError> {
        let response: DataResponse<Vec<String>> =
            self.fetch_json(endpoint, &QueryParams::new()).await?;
        Ok(response.data)
    }

    async fn fetch_export(
        &self,
        endpoint: &str,
        query: &QueryParams,
    ) -> Result<ExportTable, ClientError> {
        let payload = self.fetch(endpoint, query).await?;
        ExportTable::from_csv(payload.into_bytes())
    }
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    async fn cameras(&self) -> Result<Vec<Camera>, ClientError> {
        info!("Fetching cameras");
        let response: DataResponse<Vec<Camera>> = self
            .fetch_json(CAMERAS_ENDPOINT, &QueryParams::new())
            .await?;
        debug!("Cameras fetched: {}", response.data.len());
        Ok(response.data)
    }

    async fn animals(&self) -> Result<Vec<String>, ClientError> {
        self.fetch_list(ANIMALS_ENDPOINT).await
    }

    async fn actuator_types(&self) -> Result<Vec<String>, ClientError> {
        self.fetch_list(ACTUATOR_TYPES_ENDPOINT).await
    }

    async fn actuation_commands(&self) -> Result<Vec<String>, ClientError> {
        self.fetch_list(ACTUATION_COMMANDS_ENDPOINT).await
    }

    async fn detections(
        &self,
        filter: &DetectionFilter,
        offset: u64,
    ) -> Result<Paginated<DetectionEvent>, ClientError> {
        info!("Fetching detection events from offset {}", offset);
        let page: Paginated<DetectionEvent> = self
            .fetch_json(DETECTIONS_ENDPOINT, &filter.to_page_query(offset))
            .await?;
        debug!("Detection events fetched: {} of {}", page.count, page.total);
        Ok(page)
    }

    async fn actuations(
        &self,
        filter: &ActuationFilter,
        offset: u64,
    ) -> Result<Paginated<ActuationEvent>, ClientError> {
        info!("Fetching actuation events from offset {}", offset);
        let page: Paginated<ActuationEvent> = self
            .fetch_json(ACTUATIONS_ENDPOINT, &filter.to_page_query(offset))
            .await?;
        debug!("Actuation events fetched: {} of {}", page.count, page.total);
        Ok(page)
    }

    async fn detection_image(&self, event_id: i64) -> Result<ImageBlob, ClientError> {
        info!("Downloading image of detection event {}", event_id);
        let endpoint = format!("{}/{}/image", DETECTIONS_ENDPOINT, event_id);
        let payload = self.fetch(&endpoint, &QueryParams::new()).await?;
        Ok(ImageBlob {
            event_id,
            content_type: payload.content_type,
            server_file_name: payload.file_name,
            bytes: payload.body,
        })
    }

    async fn export_detections(
        &self,
        filter: &DetectionFilter,
    ) -> Result<ExportTable, ClientError> {
        info!("Exporting detection events");
        self.fetch_export(DETECTIONS_EXPORT_ENDPOINT, &filter.to_query())
            .await
    }

    async fn export_actuations(
        &self,
        filter: &ActuationFilter,
    ) -> Result<ExportTable, ClientError> {
        info!("Exporting actuation events");
        self.fetch_export(ACTUATIONS_EXPORT_ENDPOINT, &filter.to_query())
            .await
    }

    async fn filter_options(&self) -> Result<FilterOptions, ClientError> {
        let (cameras, animals, actuator_types, commands) = futures_util::try_join!(
            self.cameras(),
            self.animals(),
            self.actuator_types(),
            self.actuation_commands()
        )?;
        Ok(FilterOptions {
            cameras,
            animals,
            actuator_types,
            commands,
        })
    }
}
