use std::collections::HashMap;

use chrono::NaiveDate;
use diesel::SqliteConnection;

use crate::data::models::{ReviewError, StudyQueue, StudyQueueEntry};
use crate::data::repositories::{DeckRepository, ReviewableStore};

#[derive(Debug, Clone, Copy)]
pub struct QueueRequest {
    pub deck_id: Option<i32>,
    pub limit: i64,
    pub include_new: bool,
    pub new_cards_limit: i64,
}

/// Builds the next study batch: overdue items first (most overdue leading),
/// then items due today, then unseen items filling whatever budget is left.
/// Read-only; safe to retry or abandon.
pub fn build_queue<S: ReviewableStore>(
    conn: &mut SqliteConnection,
    user_id: i32,
    request: &QueueRequest,
    today: NaiveDate,
) -> Result<StudyQueue<S::Content>, ReviewError> {
    let deck_ids = resolve_deck_scope(conn, user_id, request.deck_id)?;
    if deck_ids.is_empty() {
        return Ok(StudyQueue {
            entries: Vec::new(),
            due_count: 0,
            new_count: 0,
        });
    }

    let limit = request.limit.max(0);
    let due = S::due_statistics(conn, user_id, &deck_ids, today, limit)?;

    // Due items are never displaced; new items only fill the remainder
    let remaining = limit - due.len() as i64;
    let new_ids = if request.include_new && remaining > 0 {
        S::unseen_item_ids(
            conn,
            user_id,
            &deck_ids,
            remaining.min(request.new_cards_limit.max(0)),
        )?
    } else {
        Vec::new()
    };

    let wanted: Vec<i32> = due
        .iter()
        .map(|stat| stat.item_id)
        .chain(new_ids.iter().copied())
        .collect();
    let mut content_by_id: HashMap<i32, S::Content> =
        S::load_content(conn, &wanted)?.into_iter().collect();

    let mut entries = Vec::with_capacity(wanted.len());
    let mut due_count = 0;
    let mut new_count = 0;

    for stat in &due {
        // An item deleted since its statistic was written is skipped, not fatal
        if let Some(content) = content_by_id.remove(&stat.item_id) {
            due_count += 1;
            entries.push(StudyQueueEntry {
                item_id: stat.item_id,
                is_new: false,
                status: Some(stat.status),
                next_review: Some(stat.next_review_date),
                content,
            });
        }
    }

    for item_id in new_ids {
        if let Some(content) = content_by_id.remove(&item_id) {
            new_count += 1;
            entries.push(StudyQueueEntry {
                item_id,
                is_new: true,
                status: None,
                next_review: None,
                content,
            });
        }
    }

    Ok(StudyQueue {
        entries,
        due_count,
        new_count,
    })
}

/// A named deck must exist (active, owned by the user) or the call fails;
/// the "all decks" scope simply degrades to empty for users with no decks.
pub fn resolve_deck_scope(
    conn: &mut SqliteConnection,
    user_id: i32,
    deck_id: Option<i32>,
) -> Result<Vec<i32>, ReviewError> {
    match deck_id {
        Some(deck_id) => {
            if DeckRepository::deck_exists(conn, user_id, deck_id)? {
                Ok(vec![deck_id])
            } else {
                Err(ReviewError::NotFound("Deck not found".into()))
            }
        }
        None => Ok(DeckRepository::active_deck_ids(conn, user_id)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::{ReviewStatus, ReviewableStatistic};
    use crate::data::repositories::CardStore;
    use crate::test_support::{self, days_ago};
    use chrono::Duration;

    fn request(limit: i64, include_new: bool, new_cards_limit: i64) -> QueueRequest {
        QueueRequest {
            deck_id: None,
            limit,
            include_new,
            new_cards_limit,
        }
    }

    fn reviewed_stat(
        user_id: i32,
        card_id: i32,
        next_review: chrono::NaiveDate,
    ) -> ReviewableStatistic {
        let mut stat = ReviewableStatistic::baseline(user_id, card_id, days_ago(10));
        stat.status = ReviewStatus::Learning;
        stat.repetitions = 1;
        stat.interval = 1;
        stat.next_review_date = next_review;
        stat
    }

    #[test]
    fn due_items_come_first_and_new_items_fill_the_remainder() {
        let mut conn = test_support::test_conn();
        let user_id = test_support::create_user(&mut conn, "queue@example.com");
        let deck_id = test_support::create_deck(&mut conn, user_id, "HSK 1");
        let today = days_ago(0).date();

        // 3 due cards and 8 unseen ones
        let mut card_ids = Vec::new();
        for n in 0..11 {
            card_ids.push(test_support::create_card(
                &mut conn,
                deck_id,
                &format!("front {}", n),
            ));
        }
        for (offset, card_id) in card_ids.iter().take(3).enumerate() {
            let due = today - Duration::days(offset as i64);
            CardStore::save_statistic(&mut conn, &reviewed_stat(user_id, *card_id, due)).unwrap();
        }

        let queue =
            build_queue::<CardStore>(&mut conn, user_id, &request(10, true, 5), today).unwrap();

        assert_eq!(queue.due_count, 3);
        assert_eq!(queue.new_count, 5);
        assert_eq!(queue.entries.len(), 8);
        assert!(queue.entries[..3].iter().all(|entry| !entry.is_new));
        assert!(queue.entries[3..].iter().all(|entry| entry.is_new));
    }

    #[test]
    fn overdue_items_are_ordered_most_overdue_first() {
        let mut conn = test_support::test_conn();
        let user_id = test_support::create_user(&mut conn, "overdue@example.com");
        let deck_id = test_support::create_deck(&mut conn, user_id, "HSK 2");
        let today = days_ago(0).date();

        let near = test_support::create_card(&mut conn, deck_id, "near");
        let far = test_support::create_card(&mut conn, deck_id, "far");
        CardStore::save_statistic(
            &mut conn,
            &reviewed_stat(user_id, near, today - Duration::days(1)),
        )
        .unwrap();
        CardStore::save_statistic(
            &mut conn,
            &reviewed_stat(user_id, far, today - Duration::days(9)),
        )
        .unwrap();

        let queue =
            build_queue::<CardStore>(&mut conn, user_id, &request(10, false, 0), today).unwrap();

        assert_eq!(queue.entries.len(), 2);
        assert_eq!(queue.entries[0].item_id, far);
        assert_eq!(queue.entries[1].item_id, near);
    }

    #[test]
    fn new_items_are_omitted_when_due_items_exhaust_the_limit() {
        let mut conn = test_support::test_conn();
        let user_id = test_support::create_user(&mut conn, "full@example.com");
        let deck_id = test_support::create_deck(&mut conn, user_id, "HSK 3");
        let today = days_ago(0).date();

        for n in 0..4 {
            let card_id = test_support::create_card(&mut conn, deck_id, &format!("due {}", n));
            CardStore::save_statistic(&mut conn, &reviewed_stat(user_id, card_id, today)).unwrap();
        }
        test_support::create_card(&mut conn, deck_id, "unseen");

        let queue =
            build_queue::<CardStore>(&mut conn, user_id, &request(2, true, 5), today).unwrap();

        assert_eq!(queue.due_count, 2);
        assert_eq!(queue.new_count, 0);
        assert_eq!(queue.entries.len(), 2);
    }

    #[test]
    fn include_new_false_returns_only_due_items() {
        let mut conn = test_support::test_conn();
        let user_id = test_support::create_user(&mut conn, "nonew@example.com");
        let deck_id = test_support::create_deck(&mut conn, user_id, "HSK 4");
        let today = days_ago(0).date();

        test_support::create_card(&mut conn, deck_id, "unseen");

        let queue =
            build_queue::<CardStore>(&mut conn, user_id, &request(10, false, 5), today).unwrap();

        assert!(queue.entries.is_empty());
    }

    #[test]
    fn unknown_deck_scope_fails_while_all_decks_degrades_to_empty() {
        let mut conn = test_support::test_conn();
        let user_id = test_support::create_user(&mut conn, "scopes@example.com");
        let today = days_ago(0).date();

        let missing = QueueRequest {
            deck_id: Some(999),
            limit: 10,
            include_new: true,
            new_cards_limit: 5,
        };
        assert!(matches!(
            build_queue::<CardStore>(&mut conn, user_id, &missing, today),
            Err(ReviewError::NotFound(_))
        ));

        let queue =
            build_queue::<CardStore>(&mut conn, user_id, &request(10, true, 5), today).unwrap();
        assert!(queue.entries.is_empty());
    }

    #[test]
    fn deactivated_cards_are_silently_excluded() {
        let mut conn = test_support::test_conn();
        let user_id = test_support::create_user(&mut conn, "gone@example.com");
        let deck_id = test_support::create_deck(&mut conn, user_id, "HSK 5");
        let today = days_ago(0).date();

        let kept = test_support::create_card(&mut conn, deck_id, "kept");
        let removed = test_support::create_card(&mut conn, deck_id, "removed");
        CardStore::save_statistic(&mut conn, &reviewed_stat(user_id, kept, today)).unwrap();
        CardStore::save_statistic(&mut conn, &reviewed_stat(user_id, removed, today)).unwrap();
        test_support::deactivate_card(&mut conn, removed);

        let queue =
            build_queue::<CardStore>(&mut conn, user_id, &request(10, false, 0), today).unwrap();

        assert_eq!(queue.entries.len(), 1);
        assert_eq!(queue.entries[0].item_id, kept);
    }
}
