use uuid::Uuid;

use crate::{
    dto::{dishes::CreateDishRequest, reviews::CreateReviewRequest},
    error::{AppError, AppResult},
    validation::{parse_price, require_fields},
};

/// A create form that can be shown, filled in, and discarded.
#[derive(Debug, Clone, Default)]
pub struct FormState<T> {
    visible: bool,
    draft: T,
}

impl<T: Default> FormState<T> {
    pub fn open(&mut self) {
        self.visible = true;
    }

    /// Hides the form and empties the draft.
    pub fn cancel(&mut self) {
        self.visible = false;
        self.draft = T::default();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut T {
        &mut self.draft
    }
}

/// Raw add-dish form input; the price is still text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
}

impl DishDraft {
    pub fn to_request(&self) -> AppResult<CreateDishRequest> {
        require_fields(&[
            ("name", self.name.as_str()),
            ("description", self.description.as_str()),
            ("price", self.price.as_str()),
            ("category", self.category.as_str()),
        ])?;
        Ok(CreateDishRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            price: parse_price(&self.price)?,
            category: self.category.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDraft {
    pub rating: Option<u8>,
    pub comment: String,
}

impl ReviewDraft {
    pub fn to_request(&self) -> AppResult<CreateReviewRequest> {
        let mut missing = Vec::new();
        if self.rating.is_none() {
            missing.push("rating");
        }
        if self.comment.trim().is_empty() {
            missing.push("comment");
        }
        match self.rating {
            Some(rating) if missing.is_empty() => Ok(CreateReviewRequest {
                rating,
                comment: self.comment.clone(),
            }),
            _ => Err(AppError::validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            ))),
        }
    }
}

/// A delete waiting for the user to confirm it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDeletion {
    Restaurant(Uuid),
    Dish(Uuid),
    Review(Uuid),
}

impl PendingDeletion {
    pub fn prompt(&self) -> &'static str {
        match self {
            PendingDeletion::Restaurant(_) => "Are you sure you want to delete this restaurant?",
            PendingDeletion::Dish(_) => "Are you sure you want to delete this dish?",
            PendingDeletion::Review(_) => "Are you sure you want to delete this review?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Short-lived banner text produced by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_hides_and_clears_the_draft() {
        let mut form = FormState::<ReviewDraft>::default();
        form.open();
        form.draft_mut().rating = Some(3);
        form.draft_mut().comment = "ok".into();
        form.cancel();
        assert!(!form.is_visible());
        assert_eq!(form.draft(), &ReviewDraft::default());
    }

    #[test]
    fn dish_draft_reports_blank_fields_before_parsing_price() {
        let draft = DishDraft {
            name: "Soup".into(),
            price: "abc".into(),
            ..Default::default()
        };
        let err = draft.to_request().unwrap_err();
        assert_eq!(err.to_string(), "Missing required field(s): description, category");

        let draft = DishDraft {
            description: "Hot".into(),
            category: "Starters".into(),
            ..draft
        };
        assert_eq!(draft.to_request().unwrap_err().to_string(), "price must be a number");
    }

    #[test]
    fn review_draft_requires_a_star_choice() {
        let draft = ReviewDraft {
            rating: None,
            comment: String::new(),
        };
        assert_eq!(
            draft.to_request().unwrap_err().to_string(),
            "Missing required field(s): rating, comment"
        );
        let draft = ReviewDraft {
            rating: Some(5),
            comment: "Lovely".into(),
        };
        assert_eq!(draft.to_request().unwrap().rating, 5);
    }
}
