use anyhow::{anyhow, Context, Result};
use bgp_reconcile::MergeState;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};

use crate::store::{
    DateMarkerStore, GameRow, GameStore, PlayDelta, PlayKey, PlayRecordRow, PlayRecordStore,
};

/// Postgres-backed ledger store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl GameStore for PgStore {
    async fn find_game_by_name(&self, name: &str) -> Result<Option<GameRow>> {
        let row = sqlx::query(
            r#"
            select game_id, name, color_tag
            from games
            where name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("find_game_by_name failed")?;

        match row {
            None => Ok(None),
            Some(r) => Ok(Some(GameRow {
                game_id: r.try_get("game_id").context("games.game_id")?,
                name: r.try_get("name").context("games.name")?,
                color_tag: r.try_get("color_tag").context("games.color_tag")?,
            })),
        }
    }

    async fn insert_game(&self, game: &GameRow) -> Result<()> {
        sqlx::query(
            r#"
            insert into games (game_id, name, color_tag)
            values ($1, $2, $3)
            "#,
        )
        .bind(game.game_id)
        .bind(&game.name)
        .bind(&game.color_tag)
        .execute(&self.pool)
        .await
        .context("insert_game failed")?;
        Ok(())
    }

    async fn claim_color_tag(&self, tag: &str) -> Result<bool> {
        let res = sqlx::query(
            r#"
            insert into color_tags (color_tag)
            values ($1)
            on conflict (color_tag) do nothing
            "#,
        )
        .bind(tag)
        .execute(&self.pool)
        .await
        .context("claim_color_tag failed")?;
        Ok(res.rows_affected() == 1)
    }

    async fn count_games(&self) -> Result<i64> {
        let (n,): (i64,) = sqlx::query_as::<_, (i64,)>("select count(*)::bigint from games")
            .fetch_one(&self.pool)
            .await
            .context("count_games failed")?;
        Ok(n)
    }
}

#[async_trait::async_trait]
impl PlayRecordStore for PgStore {
    async fn find_play_record(&self, key: &PlayKey) -> Result<Option<PlayRecordRow>> {
        let row = sqlx::query(
            r#"
            select play_count, merge_state
            from play_records
            where play_date = $1
              and game_id = $2
            "#,
        )
        .bind(key.play_date)
        .bind(key.game_id)
        .fetch_optional(&self.pool)
        .await
        .context("find_play_record failed")?;

        let Some(r) = row else {
            return Ok(None);
        };

        let state: String = r.try_get("merge_state").context("play_records.merge_state")?;
        Ok(Some(PlayRecordRow {
            key: *key,
            play_count: r.try_get("play_count").context("play_records.play_count")?,
            merge_state: MergeState::parse(&state)?,
        }))
    }

    async fn insert_play_record(&self, row: &PlayRecordRow) -> Result<()> {
        sqlx::query(
            r#"
            insert into play_records (play_date, game_id, play_count, merge_state)
            values ($1, $2, $3, $4)
            "#,
        )
        .bind(row.key.play_date)
        .bind(row.key.game_id)
        .bind(row.play_count)
        .bind(row.merge_state.as_str())
        .execute(&self.pool)
        .await
        .context("insert_play_record failed")?;
        Ok(())
    }

    async fn update_play_record(&self, key: &PlayKey, delta: &PlayDelta) -> Result<()> {
        let res = match *delta {
            PlayDelta::Increment { by, merge_state } => sqlx::query(
                r#"
                update play_records
                set play_count = play_count + $3,
                    merge_state = $4,
                    updated_at_utc = now()
                where play_date = $1
                  and game_id = $2
                "#,
            )
            .bind(key.play_date)
            .bind(key.game_id)
            .bind(by)
            .bind(merge_state.as_str())
            .execute(&self.pool)
            .await
            .context("update_play_record increment failed")?,

            PlayDelta::Set {
                play_count,
                merge_state,
            } => sqlx::query(
                r#"
                update play_records
                set play_count = $3,
                    merge_state = $4,
                    updated_at_utc = now()
                where play_date = $1
                  and game_id = $2
                "#,
            )
            .bind(key.play_date)
            .bind(key.game_id)
            .bind(play_count)
            .bind(merge_state.as_str())
            .execute(&self.pool)
            .await
            .context("update_play_record set failed")?,
        };

        if res.rows_affected() != 1 {
            return Err(anyhow!(
                "update_play_record: no record for date={} game_id={}",
                key.play_date,
                key.game_id
            ));
        }
        Ok(())
    }

    async fn count_play_records(&self) -> Result<i64> {
        let (n,): (i64,) =
            sqlx::query_as::<_, (i64,)>("select count(*)::bigint from play_records")
                .fetch_one(&self.pool)
                .await
                .context("count_play_records failed")?;
        Ok(n)
    }
}

#[async_trait::async_trait]
impl DateMarkerStore for PgStore {
    async fn date_marker_exists(&self, play_date: NaiveDate) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
            r#"select exists(select 1 from date_markers where play_date = $1)"#,
        )
        .bind(play_date)
        .fetch_one(&self.pool)
        .await
        .context("date_marker_exists failed")?;
        Ok(exists)
    }

    async fn insert_date_marker(&self, play_date: NaiveDate) -> Result<()> {
        sqlx::query(
            r#"
            insert into date_markers (play_date)
            values ($1)
            on conflict (play_date) do nothing
            "#,
        )
        .bind(play_date)
        .execute(&self.pool)
        .await
        .context("insert_date_marker failed")?;
        Ok(())
    }
}
