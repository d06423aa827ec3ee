use std::fs::Metadata;
use std::time::SystemTime;

use chrono::{DateTime, Local};

pub struct MetadataConverter;

impl MetadataConverter {
    /// Data di creazione, o di modifica dove la piattaforma non la fornisce
    pub fn created(metadata: &Metadata) -> Option<SystemTime> {
        metadata.created().or_else(|_| metadata.modified()).ok()
    }

    pub fn format_time(time: Option<SystemTime>) -> String {
        match time {
            Some(time) => DateTime::<Local>::from(time)
                .format("%d/%m/%Y %H:%M:%S")
                .to_string(),
            None => "N/A".to_string(),
        }
    }

    pub fn format_size(size: u64) -> String {
        let mut value = size as f64;
        for unit in ["B", "KB", "MB", "GB", "TB"] {
            if value < 1024.0 {
                return format!("{:.2} {}", value, unit);
            }
            value /= 1024.0;
        }
        format!("{:.2} PB", value)
    }
}
