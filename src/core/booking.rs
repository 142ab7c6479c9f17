//! Appointment booking wizard: service, duration, date/time, confirmation.

use chrono::{Days, NaiveDate};
use thiserror::Error;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const VISIBLE_DATES: u32 = 5;

pub const DURATIONS: [(u32, &str); 3] = [
    (30, "Quick Calibration"),
    (60, "Standard Session"),
    (90, "Deep Immersion"),
];

pub const TIME_SLOTS: [&str; 8] = [
    "09:00 AM", "10:00 AM", "11:30 AM", "01:00 PM", "02:30 PM", "04:00 PM", "05:30 PM", "07:00 PM",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("{action} is not allowed at step {step:?}")]
    WrongStep {
        action: &'static str,
        step: BookingStep,
    },
    #[error("unsupported duration: {0} minutes")]
    InvalidDuration(u32),
    #[error("unknown time slot: {0}")]
    InvalidTime(String),
    #[error("date {0} is not currently visible")]
    DateNotVisible(NaiveDate),
    #[error("pick a date and a time first")]
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ServiceType {
    Clinic,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BookingStep {
    Service,
    Duration,
    Schedule,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Appointment {
    pub service: ServiceType,
    pub duration_minutes: u32,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BookingWizard {
    step: BookingStep,
    service: Option<ServiceType>,
    duration_minutes: Option<u32>,
    date: Option<NaiveDate>,
    time: Option<String>,
    date_offset: u32,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWizard {
    pub fn new() -> Self {
        Self {
            step: BookingStep::Service,
            service: None,
            duration_minutes: None,
            date: None,
            time: None,
            date_offset: 0,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    fn expect(&self, step: BookingStep, action: &'static str) -> Result<(), BookingError> {
        if self.step != step {
            return Err(BookingError::WrongStep {
                action,
                step: self.step,
            });
        }
        Ok(())
    }

    pub fn choose_service(&mut self, service: ServiceType) -> Result<(), BookingError> {
        self.expect(BookingStep::Service, "choose_service")?;
        self.service = Some(service);
        self.step = BookingStep::Duration;
        Ok(())
    }

    pub fn choose_duration(&mut self, minutes: u32) -> Result<(), BookingError> {
        self.expect(BookingStep::Duration, "choose_duration")?;
        if !DURATIONS.iter().any(|(m, _)| *m == minutes) {
            return Err(BookingError::InvalidDuration(minutes));
        }
        self.duration_minutes = Some(minutes);
        self.step = BookingStep::Schedule;
        Ok(())
    }

    /// The five dates currently offered, starting at `today + offset`.
    pub fn visible_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..VISIBLE_DATES)
            .filter_map(|i| {
                let offset = self.date_offset.saturating_add(i);
                today.checked_add_days(Days::new(u64::from(offset)))
            })
            .collect()
    }

    pub fn next_dates(&mut self) {
        self.date_offset = self.date_offset.saturating_add(VISIBLE_DATES);
    }

    pub fn prev_dates(&mut self) {
        self.date_offset = self.date_offset.saturating_sub(VISIBLE_DATES);
    }

    pub fn date_offset(&self) -> u32 {
        self.date_offset
    }

    pub fn choose_date(&mut self, today: NaiveDate, date: NaiveDate) -> Result<(), BookingError> {
        self.expect(BookingStep::Schedule, "choose_date")?;
        if !self.visible_dates(today).contains(&date) {
            return Err(BookingError::DateNotVisible(date));
        }
        self.date = Some(date);
        Ok(())
    }

    pub fn choose_time(&mut self, slot: &str) -> Result<(), BookingError> {
        self.expect(BookingStep::Schedule, "choose_time")?;
        if !TIME_SLOTS.contains(&slot) {
            return Err(BookingError::InvalidTime(slot.to_string()));
        }
        self.time = Some(slot.to_string());
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<Appointment, BookingError> {
        self.expect(BookingStep::Schedule, "confirm")?;
        let (Some(service), Some(duration_minutes), Some(date), Some(time)) = (
            self.service,
            self.duration_minutes,
            self.date,
            self.time.clone(),
        ) else {
            return Err(BookingError::Incomplete);
        };
        self.step = BookingStep::Confirmed;
        info!(?service, duration_minutes, %date, %time, "appointment confirmed");
        Ok(Appointment {
            service,
            duration_minutes,
            date,
            time,
        })
    }

    /// One step back. Earlier choices are kept so going forward again only
    /// needs the step being revisited.
    pub fn back(&mut self) -> Result<BookingStep, BookingError> {
        self.step = match self.step {
            BookingStep::Duration => BookingStep::Service,
            BookingStep::Schedule => BookingStep::Duration,
            step => {
                return Err(BookingError::WrongStep {
                    action: "back",
                    step,
                })
            }
        };
        Ok(self.step)
    }

    pub fn service(&self) -> Option<ServiceType> {
        self.service
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    /// Back to the first step with nothing selected.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
