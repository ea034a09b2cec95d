//! Navigation fencing for the item worklist.
//!
//! The engine keeps no versions of its own, so a slow "fetch annotations"
//! response for an item the user has already left must not be reconciled
//! against the item now on screen. [`Navigator`] hands out a
//! [`NavigationTicket`] per navigation; starting a new navigation abandons
//! the previous ticket, and every later step presented with an abandoned
//! ticket fails with [`Error::StaleNavigation`].
//!
//! Steps run in a fixed order:
//!
//! ```text
//! FetchItem → FetchAnnotations → UpdateCache → Navigate → Confirm
//! ```
//!
//! Everything here is synchronous; the caller owns scheduling and I/O.

use crate::config::ProjectConfig;
use crate::item::ItemAnnotations;
use crate::offset::annotation_to_char_offsets;
use annotate_core::{Annotation, Error, Relation, Result};
use serde::{Deserialize, Serialize};

/// One step of a navigation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationStep {
    /// Fetch the item content
    FetchItem,
    /// Fetch stored annotations, relations, and predictions
    FetchAnnotations,
    /// Write the reconciled state into the local item cache
    UpdateCache,
    /// Switch the visible item
    Navigate,
    /// Acknowledge the navigation as finished
    Confirm,
}

impl NavigationStep {
    /// The first step of every navigation.
    pub const FIRST: Self = Self::FetchItem;

    /// The step that must follow this one.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::FetchItem => Some(Self::FetchAnnotations),
            Self::FetchAnnotations => Some(Self::UpdateCache),
            Self::UpdateCache => Some(Self::Navigate),
            Self::Navigate => Some(Self::Confirm),
            Self::Confirm => None,
        }
    }

    /// Step name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FetchItem => "fetch_item",
            Self::FetchAnnotations => "fetch_annotations",
            Self::UpdateCache => "update_cache",
            Self::Navigate => "navigate",
            Self::Confirm => "confirm",
        }
    }
}

impl std::fmt::Display for NavigationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fetched item, as delivered by the request layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedItem {
    /// Item identifier
    pub item_id: String,
    /// Text content (empty for image items)
    #[serde(default)]
    pub content: String,
    /// Stored annotations
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Stored relations
    #[serde(default)]
    pub relations: Vec<Relation>,
    /// Live model predictions
    #[serde(default)]
    pub predictions: Vec<Annotation>,
}

/// Handle for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTicket {
    generation: u64,
    item_id: String,
    completed: Option<NavigationStep>,
}

impl NavigationTicket {
    /// Target item.
    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Last step completed, if any.
    #[must_use]
    pub fn completed(&self) -> Option<NavigationStep> {
        self.completed
    }

    /// The step this ticket must run next.
    #[must_use]
    pub fn expected(&self) -> Option<NavigationStep> {
        match self.completed {
            None => Some(NavigationStep::FIRST),
            Some(step) => step.next(),
        }
    }
}

/// Serializes navigations: one in flight at a time, newest wins.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    generation: u64,
    in_flight: bool,
    current_item: Option<String>,
}

impl Navigator {
    /// Create a navigator with nothing on screen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The item whose navigation last reached [`NavigationStep::Confirm`].
    #[must_use]
    pub fn current_item(&self) -> Option<&str> {
        self.current_item.as_deref()
    }

    /// Start navigating to `item_id`, abandoning any navigation in flight.
    pub fn begin(&mut self, item_id: impl Into<String>) -> NavigationTicket {
        let item_id = item_id.into();
        if self.in_flight {
            log::debug!(
                "abandoning navigation generation {} for {}",
                self.generation,
                item_id
            );
        }
        self.generation += 1;
        self.in_flight = true;
        NavigationTicket {
            generation: self.generation,
            item_id,
            completed: None,
        }
    }

    /// Whether `ticket` belongs to the newest navigation.
    #[must_use]
    pub fn is_current(&self, ticket: &NavigationTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Record that `step` finished for `ticket`.
    ///
    /// # Errors
    ///
    /// [`Error::StaleNavigation`] if a newer navigation has started;
    /// [`Error::OutOfOrder`] if `step` is not the next step for this ticket.
    pub fn advance(&self, ticket: &mut NavigationTicket, step: NavigationStep) -> Result<()> {
        self.ensure_current(ticket, step)?;
        match ticket.expected() {
            Some(expected) if expected == step => {
                ticket.completed = Some(step);
                Ok(())
            }
            Some(expected) => Err(Error::out_of_order(format!(
                "expected {expected}, got {step}"
            ))),
            None => Err(Error::out_of_order(format!(
                "navigation to {} already confirmed",
                ticket.item_id
            ))),
        }
    }

    /// Complete [`NavigationStep::FetchAnnotations`] and reconcile the result.
    ///
    /// Stored payload offsets are converted to chars per the project's
    /// offset unit, dangling relations are dropped, and predictions are
    /// reconciled under the project's policy.
    ///
    /// # Errors
    ///
    /// As [`Navigator::advance`]; also [`Error::InvalidInput`] when the
    /// loaded item is not the ticket's item. Staleness is checked first.
    pub fn load_annotations(
        &self,
        ticket: &mut NavigationTicket,
        loaded: LoadedItem,
        config: &ProjectConfig,
    ) -> Result<ItemAnnotations> {
        self.ensure_current(ticket, NavigationStep::FetchAnnotations)?;
        if loaded.item_id != ticket.item_id {
            return Err(Error::invalid_input(format!(
                "loaded item {} does not match navigation to {}",
                loaded.item_id, ticket.item_id
            )));
        }
        self.advance(ticket, NavigationStep::FetchAnnotations)?;

        let unit = config.offset_unit;
        let stored = ItemAnnotations::new(loaded.annotations, loaded.relations)
            .to_char_offsets(&loaded.content, unit);
        let predictions: Vec<Annotation> = loaded
            .predictions
            .iter()
            .map(|p| annotation_to_char_offsets(p, &loaded.content, unit))
            .collect();

        Ok(stored.reconcile(&predictions, config.policy()))
    }

    fn ensure_current(&self, ticket: &NavigationTicket, step: NavigationStep) -> Result<()> {
        if self.is_current(ticket) {
            return Ok(());
        }
        log::debug!(
            "discarding {} for {}: generation {} superseded by {}",
            step,
            ticket.item_id,
            ticket.generation,
            self.generation
        );
        Err(Error::stale_navigation(format!(
            "navigation to {} was superseded",
            ticket.item_id
        )))
    }

    /// Complete [`NavigationStep::Confirm`], making the ticket's item current.
    ///
    /// # Errors
    ///
    /// As [`Navigator::advance`].
    pub fn confirm(&mut self, ticket: &mut NavigationTicket) -> Result<()> {
        self.advance(ticket, NavigationStep::Confirm)?;
        self.in_flight = false;
        self.current_item = Some(ticket.item_id.clone());
        Ok(())
    }
}
