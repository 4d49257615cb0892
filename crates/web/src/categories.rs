//! Category creation.

use aggregator::ensure_single_level;
use api_types::{CategoryType, category::CategoryNew};
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    ServerError, finish_submit,
    server::AppState,
    session::{Flash, Session},
    views,
};

const BACK: &str = "/categories/new";

#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type", default = "default_type")]
    category_type: CategoryType,
}

fn default_type() -> CategoryType {
    CategoryType::Expense
}

pub async fn new_form(
    session: Session,
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(query): Query<TypeQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let categories = state.api.categories(&session.token, None).await?;
    ensure_single_level(&categories)?;

    let (jar, flash) = Flash::take(jar);
    let page = views::category_form_page(
        &session.username,
        flash.as_ref(),
        query.category_type,
        &categories,
    );
    Ok((jar, page))
}

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    name: String,
    #[serde(rename = "type")]
    category_type: CategoryType,
    #[serde(default)]
    parent_id: Option<String>,
}

impl CategoryForm {
    fn into_payload(self) -> Result<CategoryNew, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Category name is required.".to_string());
        }
        let parent_id = match self.parent_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| "Invalid parent category.".to_string())?,
            ),
        };

        Ok(CategoryNew {
            name,
            category_type: self.category_type,
            parent_id,
        })
    }
}

pub async fn create(
    session: Session,
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<CategoryForm>,
) -> Response {
    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(message) => return finish_submit(jar, Err(message.into()), "/", BACK),
    };

    // A new category is usually created while filling in a transaction.
    let next = format!("/transactions/new?mode={}", payload.category_type);
    let result = state
        .api
        .create_category(&session.token, &payload)
        .await
        .map(|()| "Category created.");
    finish_submit(jar, result.map_err(Into::into), &next, BACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_is_optional() {
        let payload = CategoryForm {
            name: " Snacks ".to_string(),
            category_type: CategoryType::Expense,
            parent_id: Some(String::new()),
        }
        .into_payload()
        .unwrap();
        assert_eq!(payload.name, "Snacks");
        assert_eq!(payload.parent_id, None);

        let payload = CategoryForm {
            name: "Snacks".to_string(),
            category_type: CategoryType::Expense,
            parent_id: Some("1".to_string()),
        }
        .into_payload()
        .unwrap();
        assert_eq!(payload.parent_id, Some(1));
    }

    #[test]
    fn blank_name_is_rejected() {
        let res = CategoryForm {
            name: " ".to_string(),
            category_type: CategoryType::Income,
            parent_id: None,
        }
        .into_payload();
        assert!(res.is_err());
    }
}
