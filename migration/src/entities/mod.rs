pub mod qr_code;
pub mod scan_event;

pub use qr_code::Entity as QrCodeEntity;
pub use scan_event::Entity as ScanEventEntity;
