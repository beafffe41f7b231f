//! Scope selection for edits and deletes against a recurring series.
//!
//! The dialog is one tagged state (`Closed`/`Open`/`Confirming`) rather
//! than a set of booleans, so "a mutation is in flight" cannot coexist with
//! "the user is still choosing". The interactive driver walks the machine
//! with dialoguer; scripted callers bypass it with `--scope`.

use anyhow::Result;
use dialoguer::{Confirm, Select};
use owo_colors::OwoColorize;
use ridepool_core::models::{EditScope, Ride};
use ridepool_core::scope::ScopeOptions;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogVariant {
    Edit,
    Delete,
}

impl std::fmt::Display for DialogVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogVariant::Edit => write!(f, "edit"),
            DialogVariant::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum DialogError {
    #[error("no scope selection is open")]
    NotOpen,
    #[error("a mutation is already in flight")]
    Busy,
    #[error("scope '{0}' is not available for this posting")]
    Unavailable(EditScope),
}

#[derive(Debug)]
pub enum ScopeDialog {
    Closed,
    Open {
        variant: DialogVariant,
        anchor: Ride,
        siblings: Vec<Ride>,
        options: ScopeOptions,
        selected: EditScope,
    },
    Confirming {
        variant: DialogVariant,
        anchor_id: Uuid,
        scope: EditScope,
    },
}

impl ScopeDialog {
    /// Opens the dialog for an anchor and its series siblings; the default
    /// selection is always `single`.
    pub fn open(variant: DialogVariant, anchor: Ride, siblings: Vec<Ride>) -> Self {
        let options = ScopeOptions::compute(&anchor, &siblings);
        ScopeDialog::Open {
            variant,
            anchor,
            siblings,
            options,
            selected: EditScope::Single,
        }
    }

    pub fn options(&self) -> Option<ScopeOptions> {
        match self {
            ScopeDialog::Open { options, .. } => Some(*options),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<EditScope> {
        match self {
            ScopeDialog::Open { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    /// Reselects among the offered scopes; a withheld scope is rejected.
    pub fn select(&mut self, scope: EditScope) -> Result<(), DialogError> {
        match self {
            ScopeDialog::Open {
                options, selected, ..
            } => {
                if options.count_for(scope).is_none() {
                    return Err(DialogError::Unavailable(scope));
                }
                *selected = scope;
                Ok(())
            }
            ScopeDialog::Confirming { .. } => Err(DialogError::Busy),
            ScopeDialog::Closed => Err(DialogError::NotOpen),
        }
    }

    /// Commits the selection: the dialog moves to `Confirming` and hands
    /// back what to dispatch. Further confirm/cancel calls are rejected
    /// until `settle`.
    pub fn confirm(&mut self) -> Result<(Uuid, EditScope), DialogError> {
        match std::mem::replace(self, ScopeDialog::Closed) {
            ScopeDialog::Open {
                variant,
                anchor,
                selected,
                ..
            } => {
                let anchor_id = anchor.id;
                *self = ScopeDialog::Confirming {
                    variant,
                    anchor_id,
                    scope: selected,
                };
                Ok((anchor_id, selected))
            }
            confirming @ ScopeDialog::Confirming { .. } => {
                *self = confirming;
                Err(DialogError::Busy)
            }
            ScopeDialog::Closed => Err(DialogError::NotOpen),
        }
    }

    /// Dismisses an open dialog without mutating anything. Not available
    /// while a mutation is in flight.
    pub fn cancel(&mut self) -> Result<(), DialogError> {
        match self {
            ScopeDialog::Open { .. } => {
                *self = ScopeDialog::Closed;
                Ok(())
            }
            ScopeDialog::Confirming { .. } => Err(DialogError::Busy),
            ScopeDialog::Closed => Err(DialogError::NotOpen),
        }
    }

    /// Returns to `Closed` once the dispatched call settles, whether it
    /// succeeded or failed.
    pub fn settle(&mut self) {
        *self = ScopeDialog::Closed;
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ScopeDialog::Closed)
    }
}

/// Interactive driver: walks an open dialog through selection and
/// confirmation. Returns `None` when the user backs out; on `Some` the
/// dialog is left in `Confirming` and the caller must `settle` it after
/// the mutation call resolves.
pub fn prompt_scope(dialog: &mut ScopeDialog) -> Result<Option<(Uuid, EditScope)>> {
    let (variant, options, span) = match dialog {
        ScopeDialog::Open {
            variant,
            options,
            siblings,
            ..
        } => {
            let span = match (siblings.first(), siblings.last()) {
                (Some(first), Some(last)) => Some((first.departure_date, last.departure_date)),
                _ => None,
            };
            (*variant, *options, span)
        }
        _ => return Err(DialogError::NotOpen.into()),
    };

    let mut choices: Vec<(EditScope, String)> =
        vec![(EditScope::Single, "This ride only (1)".to_string())];
    if let Some(count) = options.future {
        choices.push((
            EditScope::Future,
            format!("This and future rides ({count})"),
        ));
    }
    choices.push((
        EditScope::Series,
        format!("The entire series ({})", options.series),
    ));

    println!(
        "{}",
        "This ride is part of a recurring series.".yellow()
    );
    if let Some((first, last)) = span {
        println!("  {} occurrences from {} to {}", options.series, first, last);
    }
    let labels: Vec<&String> = choices.iter().map(|(_, label)| label).collect();
    let selection = Select::new()
        .with_prompt(format!("How would you like to apply the {variant}?"))
        .items(&labels)
        .default(0)
        .interact()?;

    let scope = choices[selection].0;
    dialog.select(scope)?;

    let count = options.count_for(scope).unwrap_or(1);
    let confirmed = Confirm::new()
        .with_prompt(format!("{} {} ride(s)?", verb(variant), count))
        .default(false)
        .interact()
        .unwrap_or(false);

    if !confirmed {
        dialog.cancel()?;
        return Ok(None);
    }

    Ok(Some(dialog.confirm()?))
}

fn verb(variant: DialogVariant) -> &'static str {
    match variant {
        DialogVariant::Edit => "Apply changes to",
        DialogVariant::Delete => "Delete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use ridepool_core::models::{PostingType, RideStatus, TripDirection};

    fn test_series(len: usize) -> Vec<Ride> {
        let group_id = Uuid::now_v7();
        let poster_id = Uuid::now_v7();
        (0..len)
            .map(|offset| Ride {
                id: Uuid::now_v7(),
                poster_id,
                posting_type: PostingType::Driver,
                origin: "Oakland".to_string(),
                destination: "Sacramento".to_string(),
                origin_lat: None,
                origin_lng: None,
                destination_lat: None,
                destination_lng: None,
                departure_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
                    + chrono::Duration::days(7 * offset as i64),
                departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                is_round_trip: false,
                trip_direction: TripDirection::None,
                round_trip_group_id: Some(group_id),
                is_recurring: true,
                status: RideStatus::Active,
                seats: 3,
                price_per_seat: None,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn open_defaults_to_single_with_counts() {
        let siblings = test_series(3);
        let anchor = siblings[0].clone();
        let dialog = ScopeDialog::open(DialogVariant::Edit, anchor, siblings);

        assert_eq!(dialog.selected(), Some(EditScope::Single));
        let options = dialog.options().unwrap();
        assert_eq!(options.single, 1);
        assert_eq!(options.future, Some(3));
        assert_eq!(options.series, 3);
    }

    #[test]
    fn future_is_withheld_on_the_last_occurrence() {
        let siblings = test_series(3);
        let anchor = siblings[2].clone();
        let mut dialog = ScopeDialog::open(DialogVariant::Delete, anchor, siblings);

        assert_eq!(dialog.options().unwrap().future, None);
        assert_eq!(
            dialog.select(EditScope::Future),
            Err(DialogError::Unavailable(EditScope::Future))
        );
        // The default selection is untouched by the rejected reselect
        assert_eq!(dialog.selected(), Some(EditScope::Single));
    }

    #[test]
    fn confirm_moves_to_confirming_and_blocks_reentry() {
        let siblings = test_series(3);
        let anchor = siblings[1].clone();
        let anchor_id = anchor.id;
        let mut dialog = ScopeDialog::open(DialogVariant::Edit, anchor, siblings);

        dialog.select(EditScope::Future).unwrap();
        let (dispatched_id, scope) = dialog.confirm().unwrap();
        assert_eq!(dispatched_id, anchor_id);
        assert_eq!(scope, EditScope::Future);

        // No double submission and no cancel while in flight
        assert_eq!(dialog.confirm().unwrap_err(), DialogError::Busy);
        assert_eq!(dialog.cancel().unwrap_err(), DialogError::Busy);
        assert_eq!(dialog.select(EditScope::Single).unwrap_err(), DialogError::Busy);

        dialog.settle();
        assert!(dialog.is_closed());
    }

    #[test]
    fn cancel_from_open_closes_without_dispatch() {
        let siblings = test_series(2);
        let anchor = siblings[0].clone();
        let mut dialog = ScopeDialog::open(DialogVariant::Delete, anchor, siblings);

        dialog.cancel().unwrap();
        assert!(dialog.is_closed());
        assert_eq!(dialog.confirm().unwrap_err(), DialogError::NotOpen);
    }

    #[test]
    fn settle_after_failure_still_closes() {
        let siblings = test_series(2);
        let anchor = siblings[0].clone();
        let mut dialog = ScopeDialog::open(DialogVariant::Edit, anchor, siblings);
        dialog.confirm().unwrap();

        // The dispatched call failed; the dialog still returns to Closed
        dialog.settle();
        assert!(dialog.is_closed());
    }
}
