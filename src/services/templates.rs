//! 结构化数据 → 二维码文本
//!
//! WiFi (`WIFI:`), vCard 3.0, iCalendar VEVENT。扫码后手机直接识别，不经过跳转。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::errors::{Result, SmartQrError};

/// WiFi 字段中需要转义的字符：\ ; : "
fn escape_wifi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | ';' | ':' | '"') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// 加密方式归一化：NOPASS/OPEN → nopass，WEP/WPA2/WPA3 保留，其余一律 WPA
fn normalize_encryption(encryption: &str) -> &'static str {
    match encryption.trim().to_uppercase().as_str() {
        "NOPASS" | "OPEN" => "nopass",
        "WEP" => "WEP",
        "WPA2" => "WPA2",
        "WPA3" => "WPA3",
        _ => "WPA",
    }
}

pub fn format_wifi(ssid: &str, password: &str, encryption: &str, hidden: bool) -> String {
    let enc = normalize_encryption(encryption);
    let mut out = format!("WIFI:T:{};S:{};", enc, escape_wifi(ssid.trim()));

    if !password.is_empty() && enc != "nopass" {
        out.push_str("P:");
        out.push_str(&escape_wifi(password));
        out.push(';');
    }
    if hidden {
        out.push_str("H:true;");
    }
    out.push(';');
    out
}

/// vCard 输入，除 first_name 外均可为空
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactCard {
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: String,
}

pub fn format_vcard(card: &ContactCard) -> String {
    let first = card.first_name.trim();
    let last = card.last_name.trim();

    let full_name = if last.is_empty() {
        first.to_string()
    } else {
        format!("{} {}", first, last).trim().to_string()
    };

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", full_name),
        format!("N:{};{};;;", last, first),
    ];

    let optional = [
        ("ORG", card.organization.trim()),
        ("TITLE", card.title.trim()),
        ("TEL", card.phone.trim()),
        ("EMAIL", card.email.trim()),
    ];
    for (key, value) in optional {
        if !value.is_empty() {
            lines.push(format!("{}:{}", key, value));
        }
    }

    let website = card.website.trim();
    if !website.is_empty() {
        if website.starts_with("http") {
            lines.push(format!("URL:{}", website));
        } else {
            lines.push(format!("URL:https://{}", website));
        }
    }

    let address = card.address.trim();
    if !address.is_empty() {
        lines.push(format!("ADR;TYPE=HOME:;;{};;;;", address));
    }

    lines.push("END:VCARD".to_string());
    lines.join("\r\n")
}

/// iCal 时间格式，输入按 UTC 处理，不做时区换算
fn ical_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn format_calendar_event(
    summary: &str,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
    location: &str,
    description: &str,
) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("SUMMARY:{}", summary.trim()),
        format!("DTSTART:{}", ical_datetime(start)),
        format!("DTEND:{}", ical_datetime(end)),
    ];

    let location = location.trim();
    if !location.is_empty() {
        lines.push(format!("LOCATION:{}", location));
    }

    let description = description.trim();
    if !description.is_empty() {
        let escaped = description.replace("\r\n", "\\n").replace('\n', "\\n");
        lines.push(format!("DESCRIPTION:{}", escaped));
    }

    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}

/// 解析日期时间：RFC3339，或浏览器 datetime-local 的 `YYYY-MM-DDTHH:MM[:SS]`
///
/// 输入一律视为 UTC 墙上时间：RFC3339 的时区偏移被丢弃，不做换算。
pub fn parse_event_datetime(raw: &str) -> Result<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(SmartQrError::invalid_input("date-time is required"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local().and_utc());
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            SmartQrError::invalid_input(format!(
                "Invalid date format: '{}'. Use RFC3339 or YYYY-MM-DDTHH:MM",
                s
            ))
        })
}
