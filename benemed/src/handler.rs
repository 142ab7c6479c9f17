//! Request dispatch. One request in, one response out.

use crate::protocol::{BookingView, Request, Response};
use crate::runtime::{self, SharedState};
use beneme::booking::TIME_SLOTS;
use beneme::catalog::library_by_category;
use beneme::music::music_profile;
use beneme::pathway::generate_pathway;
use chrono::{Local, NaiveDate};
use tracing::info;

pub async fn handle_request(state: &SharedState, request: Request) -> Response {
    handle_request_on(state, request, Local::now().date_naive()).await
}

/// Same as [`handle_request`] with an explicit "today" for the booking
/// calendar.
pub async fn handle_request_on(
    state: &SharedState,
    request: Request,
    today: NaiveDate,
) -> Response {
    match request {
        Request::GetState => Response::State(state.read().await.snapshot()),
        Request::Connect => {
            let generation = runtime::connect(state).await;
            Response::success(format!("Connected (generation {generation})"))
        }
        Request::Disconnect => {
            runtime::disconnect(state).await;
            Response::success("Disconnected")
        }
        Request::ToggleChallenge { id } => {
            let mut s = state.write().await;
            match s.engine_mut().toggle_challenge(&id) {
                Ok(st) => Response::success(format!("Challenge {id}: {st:?}")),
                Err(e) => Response::error(e),
            }
        }
        Request::StartSession => {
            let mut s = state.write().await;
            match s.engine_mut().start_session() {
                Ok(()) => Response::success("Session started"),
                Err(e) => Response::error(e),
            }
        }
        Request::StopSession => {
            state.write().await.engine_mut().stop_session();
            Response::success("Session stopped")
        }
        Request::SelectMode { id } => {
            let mut s = state.write().await;
            match s.engine_mut().select_mode(&id) {
                Ok(mode) => Response::success(format!("Mode set to {}", mode.title)),
                Err(e) => Response::error(e),
            }
        }
        Request::GeneratePathway { goal } => {
            let metrics = state.read().await.engine().metrics();
            match generate_pathway(&goal, &metrics) {
                Ok(p) => Response::Pathway(p),
                Err(e) => Response::error(e),
            }
        }
        Request::GetMusicProfile => {
            let mut s = state.write().await;
            let metrics = s.engine().metrics();
            let player = s.engine().player().clone();
            let meter = player.level_meter(metrics.focus_score, s.engine_mut().rng_mut());
            Response::Music {
                profile: music_profile(&metrics),
                meter,
            }
        }
        Request::SetAtmosphere { atmosphere } => {
            state.write().await.engine_mut().player_mut().atmosphere = atmosphere;
            Response::success(format!("Atmosphere set to {}", atmosphere.label()))
        }
        Request::ToggleMute => {
            let muted = state.write().await.engine_mut().player_mut().toggle_mute();
            Response::success(if muted { "Muted" } else { "Unmuted" })
        }
        Request::ListLibrary { category } => Response::Library {
            sessions: library_by_category(&category),
        },
        Request::GetBooking => booking_view(state, today).await,
        Request::BookingService { service } => {
            let r = state.write().await.engine_mut().booking_mut().choose_service(service);
            after_booking(state, today, r).await
        }
        Request::BookingDuration { minutes } => {
            let r = state.write().await.engine_mut().booking_mut().choose_duration(minutes);
            after_booking(state, today, r).await
        }
        Request::BookingNextDates => {
            state.write().await.engine_mut().booking_mut().next_dates();
            booking_view(state, today).await
        }
        Request::BookingPrevDates => {
            state.write().await.engine_mut().booking_mut().prev_dates();
            booking_view(state, today).await
        }
        Request::BookingDate { date } => {
            let r = state
                .write()
                .await
                .engine_mut()
                .booking_mut()
                .choose_date(today, date);
            after_booking(state, today, r).await
        }
        Request::BookingTime { slot } => {
            let r = state.write().await.engine_mut().booking_mut().choose_time(&slot);
            after_booking(state, today, r).await
        }
        Request::BookingBack => {
            let r = state.write().await.engine_mut().booking_mut().back().map(|_| ());
            after_booking(state, today, r).await
        }
        Request::BookingConfirm => {
            match state.write().await.engine_mut().booking_mut().confirm() {
                Ok(appt) => Response::Appointment(appt),
                Err(e) => Response::error(e),
            }
        }
        Request::BookingReset => {
            state.write().await.engine_mut().booking_mut().reset();
            booking_view(state, today).await
        }
        Request::Reset => {
            runtime::reset(state).await;
            Response::success("Reset")
        }
        Request::Shutdown => {
            runtime::disconnect(state).await;
            info!("Shutdown requested");
            Response::success("Shutting down")
        }
    }
}

async fn booking_view(state: &SharedState, today: NaiveDate) -> Response {
    let s = state.read().await;
    let booking = s.engine().booking();
    Response::Booking(BookingView {
        step: booking.step(),
        dates: booking.visible_dates(today),
        time_slots: &TIME_SLOTS,
    })
}

async fn after_booking(
    state: &SharedState,
    today: NaiveDate,
    result: Result<(), beneme::booking::BookingError>,
) -> Response {
    match result {
        Ok(()) => booking_view(state, today).await,
        Err(e) => Response::error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::DaemonState;
    use crate::settings::Settings;
    use beneme::booking::ServiceType;
    use beneme::music::Atmosphere;
    use serde_json::Value;

    fn shared() -> SharedState {
        DaemonState::new(Settings::default()).into_shared()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 30).unwrap()
    }

    async fn send(state: &SharedState, req: Request) -> Value {
        let resp = handle_request_on(state, req, today()).await;
        serde_json::to_value(&resp).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn session_needs_a_connection() {
        let state = shared();
        let v = send(&state, Request::StartSession).await;
        assert_eq!(v["type"], "Error");
        assert_eq!(v["message"], "headband is not connected");

        assert_eq!(send(&state, Request::Connect).await["type"], "Success");
        assert_eq!(send(&state, Request::StartSession).await["type"], "Success");

        let v = send(&state, Request::GetState).await;
        assert_eq!(v["type"], "State");
        assert_eq!(v["connected"], true);
        assert_eq!(v["session"]["active"], true);

        send(&state, Request::Shutdown).await;
        assert!(!state.read().await.timers_running());
    }

    #[tokio::test]
    async fn unknown_ids_are_errors() {
        let state = shared();
        let v = send(&state, Request::ToggleChallenge { id: "c9".into() }).await;
        assert_eq!(v["type"], "Error");
        let v = send(&state, Request::SelectMode { id: "m9".into() }).await;
        assert_eq!(v["type"], "Error");
        let v = send(&state, Request::SelectMode { id: "m2".into() }).await;
        assert_eq!(v["message"], "Mode set to Flow State");
    }

    #[tokio::test]
    async fn pathway_and_music() {
        let state = shared();
        let v = send(&state, Request::GeneratePathway { goal: "deep sleep".into() }).await;
        assert_eq!(v["type"], "Pathway");
        assert_eq!(v["name"], "The Lunar Descent");

        let v = send(&state, Request::GeneratePathway { goal: " ".into() }).await;
        assert_eq!(v["type"], "Error");

        send(&state, Request::SetAtmosphere { atmosphere: Atmosphere::Celestial }).await;
        send(&state, Request::ToggleMute).await;
        let v = send(&state, Request::GetMusicProfile).await;
        assert_eq!(v["type"], "Music");
        assert_eq!(v["profile"]["instrument"], "ambient-piano");
        assert_eq!(v["meter"][0], 4.0);
    }

    #[tokio::test]
    async fn library_filters_by_category() {
        let state = shared();
        let all = send(&state, Request::ListLibrary { category: "All".into() }).await;
        let n = all["sessions"].as_array().unwrap().len();
        assert_eq!(n, beneme::catalog::LIBRARY.len());
    }

    #[tokio::test]
    async fn booking_walkthrough() {
        let state = shared();
        let v = send(&state, Request::GetBooking).await;
        assert_eq!(v["step"], "Service");
        assert_eq!(v["dates"][0], "2026-03-30");

        send(&state, Request::BookingService { service: ServiceType::Clinic }).await;
        let v = send(&state, Request::BookingDuration { minutes: 90 }).await;
        assert_eq!(v["step"], "Schedule");

        let v = send(&state, Request::BookingConfirm).await;
        assert_eq!(v["type"], "Error");

        send(&state, Request::BookingDate { date: today() }).await;
        send(&state, Request::BookingTime { slot: "04:00 PM".into() }).await;
        let v = send(&state, Request::BookingConfirm).await;
        assert_eq!(v["type"], "Appointment");
        assert_eq!(v["service"], "clinic");
        assert_eq!(v["duration_minutes"], 90);

        let v = send(&state, Request::BookingReset).await;
        assert_eq!(v["step"], "Service");
    }

    #[tokio::test]
    async fn booking_back_steps_one_page() {
        let state = shared();
        let v = send(&state, Request::BookingBack).await;
        assert_eq!(v["type"], "Error");

        send(&state, Request::BookingService { service: ServiceType::Home }).await;
        send(&state, Request::BookingDuration { minutes: 60 }).await;
        let v = send(&state, Request::BookingBack).await;
        assert_eq!(v["type"], "Booking");
        assert_eq!(v["step"], "Duration");
        let v = send(&state, Request::BookingBack).await;
        assert_eq!(v["step"], "Service");

        let s = state.read().await;
        assert_eq!(s.engine().booking().service(), Some(ServiceType::Home));
        assert_eq!(s.engine().booking().duration_minutes(), Some(60));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_timers() {
        let state = shared();
        send(&state, Request::Connect).await;
        send(&state, Request::SelectMode { id: "m3".into() }).await;
        assert!(state.read().await.timers_running());

        assert_eq!(send(&state, Request::Reset).await["type"], "Success");
        let v = send(&state, Request::GetState).await;
        assert_eq!(v["connected"], false);
        assert_eq!(v["session"]["mode_id"], Value::Null);
        assert_eq!(v["session"]["remaining_secs"], 300);
        assert!(!state.read().await.timers_running());
    }
}
