use std::str::FromStr;

use sea_orm::ActiveValue::{NotSet, Set};
use tracing::warn;

use crate::storage::models::{CodeRecord, DeviceClass, NewScanEvent, ScanEvent};
use migration::entities::{qr_code, scan_event};

/// 将 Sea-ORM Model 转换为 CodeRecord
pub fn model_to_code_record(model: qr_code::Model) -> CodeRecord {
    CodeRecord {
        id: model.id,
        name: model.name,
        payload: model.original_data,
        redirect_target: model.redirect_url,
        fill_color: model.fill_color,
        back_color: model.back_color,
        logo_reference: model.logo_path,
        created_at: model.created_at,
    }
}

/// 将 CodeRecord 转换为 ActiveModel（用于插入）
pub fn code_record_to_active_model(record: &CodeRecord) -> qr_code::ActiveModel {
    qr_code::ActiveModel {
        id: Set(record.id.clone()),
        name: Set(record.name.clone()),
        original_data: Set(record.payload.clone()),
        redirect_url: Set(record.redirect_target.clone()),
        fill_color: Set(record.fill_color.clone()),
        back_color: Set(record.back_color.clone()),
        logo_path: Set(record.logo_reference.clone()),
        created_at: Set(record.created_at),
    }
}

pub fn model_to_scan_event(model: scan_event::Model) -> ScanEvent {
    let device_class = model
        .device_type
        .as_deref()
        .and_then(|raw| match DeviceClass::from_str(raw) {
            Ok(class) => Some(class),
            Err(_) => {
                warn!("Unknown device_type '{}' in scan event {}", raw, model.id);
                None
            }
        });

    ScanEvent {
        id: model.id,
        code_id: model.qr_id,
        timestamp: model.scanned_at,
        source_ip: model.ip_address,
        device_class,
        country: model.country,
    }
}

pub fn new_scan_event_to_active_model(event: &NewScanEvent) -> scan_event::ActiveModel {
    scan_event::ActiveModel {
        id: NotSet,
        qr_id: Set(event.code_id.clone()),
        scanned_at: Set(event.timestamp),
        ip_address: Set(event.source_ip.clone()),
        device_type: Set(event.device_class.map(|c| c.to_string())),
        country: Set(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_model_to_code_record_maps_columns() {
        let now = Utc::now();
        let model = qr_code::Model {
            id: "abc".to_string(),
            name: "Menu".to_string(),
            original_data: "https://example.com/menu".to_string(),
            redirect_url: None,
            fill_color: "black".to_string(),
            back_color: "white".to_string(),
            logo_path: Some("static/logo.png".to_string()),
            created_at: now,
        };

        let record = model_to_code_record(model);
        assert_eq!(record.id, "abc");
        assert_eq!(record.payload, "https://example.com/menu");
        assert_eq!(record.redirect_target, None);
        assert_eq!(record.logo_reference.as_deref(), Some("static/logo.png"));
        assert_eq!(record.created_at, now);
    }

    #[test]
    fn test_unknown_device_type_maps_to_none() {
        let model = scan_event::Model {
            id: 7,
            qr_id: "abc".to_string(),
            scanned_at: Utc::now(),
            ip_address: Some("10.0.0.1".to_string()),
            device_type: Some("smartwatch".to_string()),
            country: None,
        };
        let event = model_to_scan_event(model);
        assert_eq!(event.device_class, None);
        assert_eq!(event.source_ip.as_deref(), Some("10.0.0.1"));
    }
}
