//! Newline-delimited JSON messages between UI clients and the daemon.

use beneme::booking::{Appointment, BookingStep, ServiceType};
use beneme::catalog::LibrarySession;
use beneme::music::{Atmosphere, MusicProfile, METER_BARS};
use beneme::observer::DashboardSnapshot;
use beneme::pathway::Pathway;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    GetState,
    Connect,
    Disconnect,
    ToggleChallenge { id: String },
    StartSession,
    StopSession,
    SelectMode { id: String },
    GeneratePathway { goal: String },
    GetMusicProfile,
    SetAtmosphere { atmosphere: Atmosphere },
    ToggleMute,
    ListLibrary {
        #[serde(default)]
        category: String,
    },
    GetBooking,
    BookingService { service: ServiceType },
    BookingDuration { minutes: u32 },
    BookingNextDates,
    BookingPrevDates,
    BookingDate { date: NaiveDate },
    BookingTime { slot: String },
    BookingBack,
    BookingConfirm,
    BookingReset,
    Reset,
    Shutdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Response {
    State(DashboardSnapshot),
    Pathway(Pathway),
    Music {
        profile: MusicProfile,
        meter: [f32; METER_BARS],
    },
    Library {
        sessions: Vec<&'static LibrarySession>,
    },
    Booking(BookingView),
    Appointment(Appointment),
    Success { message: String },
    Error { message: String },
}

impl Response {
    pub fn success(message: impl Into<String>) -> Self {
        Response::Success {
            message: message.into(),
        }
    }

    pub fn error(message: impl ToString) -> Self {
        Response::Error {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub step: BookingStep,
    pub dates: Vec<NaiveDate>,
    pub time_slots: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_tagged_by_type() {
        let req: Request = serde_json::from_str(r#"{"type":"ToggleChallenge","id":"c1"}"#).unwrap();
        assert!(matches!(req, Request::ToggleChallenge { id } if id == "c1"));

        let req: Request =
            serde_json::from_str(r#"{"type":"SetAtmosphere","atmosphere":"ocean"}"#).unwrap();
        assert!(matches!(
            req,
            Request::SetAtmosphere {
                atmosphere: Atmosphere::Ocean
            }
        ));

        let req: Request =
            serde_json::from_str(r#"{"type":"BookingDate","date":"2026-04-01"}"#).unwrap();
        assert!(matches!(req, Request::BookingDate { .. }));

        let req: Request = serde_json::from_str(r#"{"type":"BookingBack"}"#).unwrap();
        assert!(matches!(req, Request::BookingBack));
    }

    #[test]
    fn library_category_defaults_to_all() {
        let req: Request = serde_json::from_str(r#"{"type":"ListLibrary"}"#).unwrap();
        assert!(matches!(req, Request::ListLibrary { category } if category.is_empty()));
    }

    #[test]
    fn unknown_request_is_rejected() {
        assert!(serde_json::from_str::<Request>(r#"{"type":"Launch"}"#).is_err());
    }

    #[test]
    fn responses_carry_type_tag() {
        let v = serde_json::to_value(Response::success("ok")).unwrap();
        assert_eq!(v["type"], "Success");
        assert_eq!(v["message"], "ok");
    }
}
