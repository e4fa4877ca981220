use crate::core::news::enrich;
use crate::domain::model::{NewsPage, NewsQuery};
use crate::http::AppState;
use crate::utils::error::Result;
use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    q: Option<String>,
    category: Option<String>,
    max: Option<String>,
    page: Option<String>,
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<NewsPage>> {
    let query = NewsQuery::from_params(
        params.q.as_deref(),
        params.category.as_deref(),
        params.max.as_deref(),
        params.page.as_deref(),
    )?;

    let page = state.news.search(&query).await?;
    let articles = page
        .articles
        .into_iter()
        .map(|article| enrich(article, &query))
        .collect();

    Ok(Json(NewsPage {
        total_articles: page.total_articles,
        articles,
    }))
}
