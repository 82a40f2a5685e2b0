use super::camera::Camera;
use crate::utils::pagination::total_pages;
use serde::{Deserialize, Serialize};

/// Envelope of the list endpoints: `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// One page of events plus the number of events matching the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub total: u64,
    pub count: u64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn total_pages(&self, page_size: u32) -> u32 {
        total_pages(self.total, page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Image attached to a detection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub event_id: i64,
    pub content_type: Option<String>,
    /// Name the server attached to the download, when it sent one.
    pub server_file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    /// File extension matching the content type.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_deref() {
            Some(ct) if ct.starts_with("image/png") => "png",
            Some(ct) if ct.starts_with("image/jpeg") => "jpg",
            _ => "bin",
        }
    }

    /// The server's own file name, else one built from the event id and the
    /// content type.
    pub fn file_name(&self) -> String {
        match &self.server_file_name {
            Some(name) => name.clone(),
            None => format!("{}.{}", self.event_id, self.extension()),
        }
    }
}

/// Values offered by the event table filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub cameras: Vec<Camera>,
    pub animals: Vec<String>,
    pub actuator_types: Vec<String>,
    pub commands: Vec<String>,
}
