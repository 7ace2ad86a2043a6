//! Direction selection for a line's routes.

use crate::domain::{DirectionIndex, Route};

/// Returned when selecting a direction the line does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("direction {requested} is not available (current: {current})")]
pub struct UnknownDirection {
    pub requested: DirectionIndex,
    pub current: DirectionIndex,
}

/// The active direction over a line's routes.
///
/// The selection may be stale: after a line is re-fetched the selected
/// direction can disappear, in which case [`current_route`] is `None` until
/// the caller selects again. The selection is never reset implicitly.
///
/// [`current_route`]: DirectionSelector::current_route
///
/// # Examples
///
/// ```
/// use timetable_core::direction::DirectionSelector;
/// use timetable_core::domain::{DirectionIndex, Route};
///
/// let route = |d: u8| Route {
///     direction: DirectionIndex(d),
///     label: format!("dir {d}"),
///     origin: String::new(),
///     destination: String::new(),
///     stops: vec![],
///     typical_duration_mins: None,
/// };
/// let routes = vec![route(1), route(0)];
///
/// let mut selector = DirectionSelector::new(&routes, DirectionIndex(0));
/// assert!(selector.is_multi_direction());
/// assert!(selector.select(DirectionIndex(1)).is_ok());
/// assert_eq!(selector.current_route().unwrap().direction, DirectionIndex(1));
///
/// // Unknown directions leave the selection alone
/// assert!(selector.select(DirectionIndex(7)).is_err());
/// assert_eq!(selector.selected(), DirectionIndex(1));
/// ```
#[derive(Debug, Clone)]
pub struct DirectionSelector<'a> {
    routes: &'a [Route],
    selected: DirectionIndex,
}

impl<'a> DirectionSelector<'a> {
    pub fn new(routes: &'a [Route], selected: DirectionIndex) -> Self {
        Self { routes, selected }
    }

    /// Directions the line offers, ascending.
    pub fn available_directions(&self) -> Vec<DirectionIndex> {
        let mut directions: Vec<DirectionIndex> = self.routes.iter().map(|r| r.direction).collect();
        directions.sort_unstable();
        directions.dedup();
        directions
    }

    /// True when the line has more than one route.
    pub fn is_multi_direction(&self) -> bool {
        self.routes.len() > 1
    }

    /// Whether to render the direction toggle at all.
    ///
    /// Single-route lines hide the toggle rather than disabling it.
    pub fn shows_toggle(&self) -> bool {
        self.is_multi_direction()
    }

    pub fn selected(&self) -> DirectionIndex {
        self.selected
    }

    /// Route matching the selection, or `None` if the selection is stale.
    pub fn current_route(&self) -> Option<&'a Route> {
        self.routes.iter().find(|r| r.direction == self.selected)
    }

    pub fn is_available(&self, direction: DirectionIndex) -> bool {
        self.routes.iter().any(|r| r.direction == direction)
    }

    /// Switch to `direction` if the line has it.
    pub fn select(&mut self, direction: DirectionIndex) -> Result<(), UnknownDirection> {
        if !self.is_available(direction) {
            return Err(UnknownDirection {
                requested: direction,
                current: self.selected,
            });
        }
        self.selected = direction;
        Ok(())
    }
}
