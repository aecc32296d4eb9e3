use serde::{Deserialize, Serialize};

use crate::db_types::{MenuItem, Restaurant};

/// Public restaurant search. `search_text` matches the name, city or country. When `cuisines` is not empty, a
/// restaurant must offer at least one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantQuery {
    pub search_text: Option<String>,
    pub cuisines: Vec<String>,
}

impl RestaurantQuery {
    pub fn with_search_text<S: Into<String>>(mut self, text: S) -> Self {
        let text = text.into();
        self.search_text = if text.trim().is_empty() { None } else { Some(text.trim().to_string()) };
        self
    }

    pub fn with_cuisine<S: Into<String>>(mut self, cuisine: S) -> Self {
        self.cuisines.push(cuisine.into());
        self
    }

    /// Case-insensitive match against a restaurant. The SQLite backend does the same filtering in SQL.
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        let text_match = self.search_text.as_ref().map_or(true, |t| {
            let t = t.to_lowercase();
            [&restaurant.name, &restaurant.city, &restaurant.country].iter().any(|f| f.to_lowercase().contains(&t))
        });
        let cuisine_match = self.cuisines.is_empty() ||
            self.cuisines.iter().any(|c| restaurant.cuisines.iter().any(|rc| rc.eq_ignore_ascii_case(c)));
        text_match && cuisine_match
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantWithMenu {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub menus: Vec<MenuItem>,
}
