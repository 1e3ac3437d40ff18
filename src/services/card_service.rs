use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::{
    dto::cards::{CardList, SaveCardRequest},
    entity::saved_cards::{
        ActiveModel as SavedCardActive, Column as CardCol, Entity as SavedCards,
        Model as SavedCardModel,
    },
    error::{AppError, AppResult},
    models::SavedCard,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Default card first, then newest first.
pub async fn list_cards(state: &AppState) -> AppResult<ApiResponse<CardList>> {
    let data = snapshot(state).await?;
    let count = data.items.len() as i64;
    Ok(ApiResponse::success("OK", data, Some(Meta::new(1, count, count))))
}

pub async fn snapshot(state: &AppState) -> AppResult<CardList> {
    let items = SavedCards::find()
        .order_by_desc(CardCol::IsDefault)
        .order_by_desc(CardCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(card_from_entity)
        .collect();
    Ok(CardList { items })
}

/// Store a card subject to the duplicate and single-default rules.
///
/// A card with the same last four digits and network tag as an existing row
/// is skipped silently; the row already on file is handed back. The first
/// card ever saved becomes default no matter what the caller asked for.
pub async fn save_card(
    state: &AppState,
    payload: SaveCardRequest,
) -> AppResult<ApiResponse<SavedCard>> {
    let last_four = last_four_digits(&payload.card_number)?;

    let duplicates: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM saved_cards WHERE last_four = ? AND network = ?")
            .bind(&last_four)
            .bind(&payload.network)
            .fetch_one(&state.pool)
            .await?;

    if duplicates > 0 {
        let card = SavedCards::find()
            .filter(CardCol::LastFour.eq(last_four))
            .filter(CardCol::Network.eq(payload.network))
            .one(&state.orm)
            .await?
            .ok_or(AppError::NotFound)?;
        return Ok(ApiResponse::success(
            "Card already saved",
            card_from_entity(card),
            None,
        ));
    }

    let saved_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM saved_cards")
        .fetch_one(&state.pool)
        .await?;
    let make_default = payload.set_default || saved_count == 0;

    let txn = state.orm.begin().await?;

    if make_default {
        // clear first, set second: the pair keeps at most one default
        SavedCards::update_many()
            .col_expr(CardCol::IsDefault, Expr::value(false))
            .exec(&txn)
            .await?;
    }

    let card = SavedCardActive {
        holder_name: Set(payload.holder_name),
        last_four: Set(last_four),
        expiry: Set(payload.expiry),
        network: Set(payload.network),
        is_default: Set(make_default),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    state.feed.cards_changed();
    Ok(ApiResponse::success(
        "Card saved",
        card_from_entity(card),
        None,
    ))
}

/// Move the default flag to the given card: clear every flag, then raise the
/// target's, as one transaction.
pub async fn set_default_card(state: &AppState, id: i32) -> AppResult<ApiResponse<SavedCard>> {
    let txn = state.orm.begin().await?;

    let card = SavedCards::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    SavedCards::update_many()
        .col_expr(CardCol::IsDefault, Expr::value(false))
        .exec(&txn)
        .await?;

    let mut active: SavedCardActive = card.into();
    active.is_default = Set(true);
    let card = active.update(&txn).await?;

    txn.commit().await?;

    state.feed.cards_changed();
    Ok(ApiResponse::success(
        "Default card updated",
        card_from_entity(card),
        None,
    ))
}

/// Deleting the default card leaves no default; the next save does not
/// inherit the flag.
pub async fn delete_card(state: &AppState, id: i32) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = SavedCards::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    state.feed.cards_changed();
    Ok(ApiResponse::empty("Card deleted"))
}

fn card_from_entity(model: SavedCardModel) -> SavedCard {
    SavedCard {
        id: model.id,
        holder_name: model.holder_name,
        last_four: model.last_four,
        expiry: model.expiry,
        network: model.network,
        is_default: model.is_default,
        created_at: model.created_at,
    }
}

fn last_four_digits(card_number: &str) -> AppResult<String> {
    let digits: String = card_number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return Err(AppError::BadRequest(
            "card number must contain at least 4 digits".to_string(),
        ));
    }
    Ok(digits[digits.len() - 4..].to_string())
}
