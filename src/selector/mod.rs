//! # Restaurant Selection
//!
//! Chooses which restaurant fulfils an item when several offer it. The strategies form a
//! closed set, [`SelectionStrategy`], carried by each placement request.
//!
//! A [`Candidate`] pairs a restaurant with the menu item it would serve, so price-based
//! selection compares what each restaurant actually charges for the dish.

pub mod error;

pub use error::SelectionError;

use crate::model::{MenuItem, OrderItemRequest, Restaurant};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// A restaurant able to serve a requested item, with its own listing for that item.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub restaurant: Restaurant,
    pub offering: MenuItem,
}

/// How to pick one restaurant among several candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Cheapest listing for the requested item.
    LowestCost,
    /// Best-rated restaurant.
    #[default]
    HighestRating,
}

impl SelectionStrategy {
    /// `Less` means `a` is preferred over `b`.
    fn preference(self, a: &Candidate, b: &Candidate) -> Ordering {
        match self {
            SelectionStrategy::LowestCost => a.offering.price.cmp(&b.offering.price),
            SelectionStrategy::HighestRating => b.restaurant.rating.cmp(&a.restaurant.rating),
        }
    }

    /// Picks the preferred candidate. Ties go to the earliest candidate in the slice.
    pub fn select_one<'a>(
        self,
        candidates: &'a [Candidate],
        item: &OrderItemRequest,
    ) -> Result<&'a Candidate, SelectionError> {
        let mut best: Option<&Candidate> = None;
        for candidate in candidates {
            best = match best {
                Some(current) if self.preference(candidate, current) != Ordering::Less => Some(current),
                _ => Some(candidate),
            };
        }
        let chosen = best.ok_or_else(|| SelectionError::NoCandidates(item.name.clone()))?;
        debug!(
            strategy = %self,
            item = %item.name,
            restaurant_id = %chosen.restaurant.id,
            price = %chosen.offering.price,
            rating = %chosen.restaurant.rating,
            "Selected restaurant"
        );
        Ok(chosen)
    }

    /// Every candidate in preference order. Equal candidates keep their input order.
    pub fn rank(self, candidates: &[Candidate]) -> Vec<Candidate> {
        let mut ranked = candidates.to_vec();
        ranked.sort_by(|a, b| self.preference(a, b));
        ranked
    }
}

impl Display for SelectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionStrategy::LowestCost => write!(f, "lowest_cost"),
            SelectionStrategy::HighestRating => write!(f, "highest_rating"),
        }
    }
}

impl FromStr for SelectionStrategy {
    type Err = SelectionError;

    /// Accepts `price`/`lowest_cost`/`cost` and `rating`/`highest_rating`, ignoring case.
    /// An empty string means the default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" | "cost" | "lowest_cost" => Ok(SelectionStrategy::LowestCost),
            "" | "rating" | "highest_rating" => Ok(SelectionStrategy::HighestRating),
            other => Err(SelectionError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MenuItemId, RestaurantId};
    use rust_decimal::Decimal;

    fn candidate(id: u32, rating: Decimal, price: i64) -> Candidate {
        Candidate {
            restaurant: Restaurant {
                id: RestaurantId(id),
                name: format!("R{id}"),
                address: String::new(),
                cuisine_type: None,
                rating,
                is_open: true,
                max_capacity: 5,
            },
            offering: MenuItem {
                id: MenuItemId(id * 100),
                restaurant_id: RestaurantId(id),
                name: "Pizza".to_string(),
                description: None,
                price: Decimal::from(price),
            },
        }
    }

    fn pizza() -> OrderItemRequest {
        OrderItemRequest::new("Pizza", Decimal::from(10), 1)
    }

    #[test]
    fn test_highest_rating_takes_first_of_ties() {
        let candidates = vec![
            candidate(1, Decimal::new(30, 1), 10),
            candidate(2, Decimal::new(45, 1), 10),
            candidate(3, Decimal::new(45, 1), 10),
        ];
        let chosen = SelectionStrategy::HighestRating
            .select_one(&candidates, &pizza())
            .unwrap();
        assert_eq!(chosen.restaurant.id, RestaurantId(2));
    }

    #[test]
    fn test_lowest_cost_compares_each_candidates_price() {
        let candidates = vec![
            candidate(1, Decimal::from(5), 12),
            candidate(2, Decimal::from(3), 8),
            candidate(3, Decimal::from(4), 8),
        ];
        let chosen = SelectionStrategy::LowestCost
            .select_one(&candidates, &pizza())
            .unwrap();
        assert_eq!(chosen.restaurant.id, RestaurantId(2));
    }

    #[test]
    fn test_empty_candidates_fail() {
        let err = SelectionStrategy::LowestCost.select_one(&[], &pizza()).unwrap_err();
        assert_eq!(err, SelectionError::NoCandidates("Pizza".to_string()));
    }

    #[test]
    fn test_rank_is_stable() {
        let candidates = vec![
            candidate(1, Decimal::from(3), 9),
            candidate(2, Decimal::from(5), 11),
            candidate(3, Decimal::from(3), 7),
        ];
        let by_rating: Vec<_> = SelectionStrategy::HighestRating
            .rank(&candidates)
            .into_iter()
            .map(|c| c.restaurant.id.0)
            .collect();
        assert_eq!(by_rating, vec![2, 1, 3]);

        let by_price: Vec<_> = SelectionStrategy::LowestCost
            .rank(&candidates)
            .into_iter()
            .map(|c| c.restaurant.id.0)
            .collect();
        assert_eq!(by_price, vec![3, 1, 2]);
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("PRICE".parse::<SelectionStrategy>().unwrap(), SelectionStrategy::LowestCost);
        assert_eq!("rating".parse::<SelectionStrategy>().unwrap(), SelectionStrategy::HighestRating);
        assert!("fastest".parse::<SelectionStrategy>().is_err());
    }
}
