//! SeaORM building blocks for filtered, ordered, offset-paginated listings.
//!
//! `query_core` describes the request; this module turns it into one
//! storage-side query plus a count. Nothing here fetches more rows than the
//! requested window.

use query_core::{Page, PageInfo, PageRequest, TextFilter};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Select,
};

/// Escape character used for every generated `LIKE`. Backslash would need
/// backend-specific quoting in the `ESCAPE` clause; `!` does not.
pub const LIKE_ESCAPE: char = '!';

/// `LOWER(col) LIKE '%needle%' ESCAPE '!'`. The needle is already folded
/// with ASCII rules, which is what SQLite's `LOWER()` does to the column.
pub fn contains_ci<C: ColumnTrait>(col: C, filter: &TextFilter) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col)))
        .like(LikeExpr::new(filter.like_pattern(LIKE_ESCAPE)).escape(LIKE_ESCAPE))
}

/// AND of [`contains_ci`] over every present filter. No filters yields an
/// empty condition, which matches all rows.
pub fn all_contains<'a, C, I>(filters: I) -> Condition
where
    C: ColumnTrait,
    I: IntoIterator<Item = (C, Option<&'a TextFilter>)>,
{
    filters
        .into_iter()
        .filter_map(|(col, f)| f.map(|f| contains_ci(col, f)))
        .fold(Condition::all(), |cond, expr| cond.add(expr))
}

/// Count matches, then fetch `req` ordered by `order_col` ascending.
///
/// A zero limit skips the fetch and still reports the total.
pub async fn paginate<E, C, D, F>(
    select: Select<E>,
    conn: &C,
    order_col: E::Column,
    req: PageRequest,
    model_to_domain: F,
) -> Result<Page<D>, DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    C: ConnectionTrait,
    F: FnMut(E::Model) -> D,
{
    let total = select.clone().count(conn).await?;
    if req.is_empty() {
        return Ok(Page::empty(req, total));
    }

    let rows = select
        .order_by_asc(order_col)
        .offset(req.offset)
        .limit(req.limit)
        .all(conn)
        .await?;

    Ok(Page::new(
        rows.into_iter().map(model_to_domain).collect(),
        PageInfo {
            limit: req.limit,
            offset: req.offset,
            total,
        },
    ))
}
