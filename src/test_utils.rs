//! Test utilities with lazy testcontainers support
//!
//! Containers are started lazily on first use and shared across tests. Tests
//! seed their own uniquely-named rows instead of truncating, so they stay
//! safe to run concurrently against the shared containers.

pub mod containers {
    use std::sync::OnceLock;
    use testcontainers::{ContainerAsync, runners::AsyncRunner};
    use testcontainers_modules::{postgres::Postgres, redis::Redis};

    static POSTGRES: OnceLock<ContainerAsync<Postgres>> = OnceLock::new();
    static REDIS: OnceLock<ContainerAsync<Redis>> = OnceLock::new();

    /// Get or start a PostgreSQL container (lazy initialization)
    pub async fn get_postgres() -> &'static ContainerAsync<Postgres> {
        if POSTGRES.get().is_none() {
            let container = Postgres::default()
                .with_user("codeclash")
                .with_password("codeclash_test")
                .with_db_name("codeclash_test")
                .start()
                .await
                .expect("Failed to start PostgreSQL container");

            let _ = POSTGRES.set(container);
        }
        POSTGRES.get().unwrap()
    }

    /// Get or start a Redis container (lazy initialization)
    pub async fn get_redis() -> &'static ContainerAsync<Redis> {
        if REDIS.get().is_none() {
            let container = Redis::default()
                .start()
                .await
                .expect("Failed to start Redis container");

            let _ = REDIS.set(container);
        }
        REDIS.get().unwrap()
    }

    /// Get PostgreSQL connection URL from the container
    pub async fn postgres_url() -> String {
        let container = get_postgres().await;
        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(5432).await.unwrap();
        format!("postgres://codeclash:codeclash_test@{}:{}/codeclash_test", host, port)
    }

    /// Get Redis connection URL from the container
    pub async fn redis_url() -> String {
        let container = get_redis().await;
        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(6379).await.unwrap();
        format!("redis://{}:{}", host, port)
    }
}

pub mod harness {
    use redis::aio::ConnectionManager;
    use sqlx::PgPool;

    use super::containers;
    use crate::config::{
        Config, DatabaseConfig, JudgeConfig, JwtConfig, LimitsConfig, RedisConfig, ServerConfig,
    };

    /// Shared secret used by test configs and callback deliveries
    pub const CALLBACK_SECRET: &str = "cb-test-secret";

    /// Connect to the test database and run migrations
    pub async fn pool() -> PgPool {
        let database_url = containers::postgres_url().await;
        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    /// Connect a Redis connection manager to the test container
    pub async fn redis_manager() -> ConnectionManager {
        let redis_url = containers::redis_url().await;
        let client = redis::Client::open(redis_url).expect("Failed to open Redis client");
        ConnectionManager::new(client)
            .await
            .expect("Failed to connect to test Redis")
    }

    /// A full config with test values; database/redis URLs are unused since
    /// tests pass their own pool and connection manager.
    pub fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                rust_log: "info".to_string(),
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 5,
            },
            redis: RedisConfig { url: String::new() },
            jwt: JwtConfig {
                secret: "test_secret_key_for_testing_only".to_string(),
                expiry_hours: 24,
            },
            judge: JudgeConfig {
                base_url: "http://judge.invalid".to_string(),
                api_key: "test-api-key".to_string(),
                callback_base_url: "http://localhost:8080".to_string(),
                callback_secret: CALLBACK_SECRET.to_string(),
                timeout_secs: 5,
            },
            limits: LimitsConfig {
                submission_rate_limit: 5,
                submission_rate_window_secs: 60,
                max_test_cases: 50,
                max_code_size: 64 * 1024,
                max_assembled_size: 256 * 1024,
            },
        }
    }
}

pub mod seed {
    use chrono::{Duration, Utc};
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::constants::USER_CODE_MARKER;
    use crate::db::repositories::SubmissionRepository;
    use crate::models::Submission;

    /// Insert a user with a unique name and return its id
    pub async fn user(pool: &PgPool) -> Uuid {
        let tag = Uuid::new_v4().simple().to_string();
        sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, 'x') RETURNING id",
        )
        .bind(format!("u_{}", &tag[..12]))
        .bind(format!("{tag}@test.invalid"))
        .fetch_one(pool)
        .await
        .expect("Failed to seed user")
    }

    /// Insert a problem with a unique slug and return its id
    pub async fn problem(pool: &PgPool) -> Uuid {
        let tag = Uuid::new_v4().simple().to_string();
        sqlx::query_scalar("INSERT INTO problems (title, slug) VALUES ($1, $2) RETURNING id")
            .bind(format!("Problem {tag}"))
            .bind(format!("problem-{tag}"))
            .fetch_one(pool)
            .await
            .expect("Failed to seed problem")
    }

    /// Attach a template and two test vectors to a problem
    pub async fn bundle(pool: &PgPool, problem_id: &Uuid, language_id: i32) {
        sqlx::query(
            "INSERT INTO problem_templates (problem_id, language_id, template) VALUES ($1, $2, $3)",
        )
        .bind(problem_id)
        .bind(language_id)
        .bind(format!("begin\n{USER_CODE_MARKER}\nend\n"))
        .execute(pool)
        .await
        .expect("Failed to seed template");

        for index in 0..2i32 {
            sqlx::query(
                "INSERT INTO problem_test_vectors (problem_id, index, input, expected_output) VALUES ($1, $2, $3, $4)",
            )
            .bind(problem_id)
            .bind(index)
            .bind(format!("{index}"))
            .bind(format!("{index}"))
            .execute(pool)
            .await
            .expect("Failed to seed test vector");
        }
    }

    /// Insert a visible contest whose window is currently open
    pub async fn open_contest(pool: &PgPool) -> Uuid {
        let now = Utc::now();
        sqlx::query_scalar(
            "INSERT INTO contests (title, start_time, end_time) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(format!("Contest {}", Uuid::new_v4().simple()))
        .bind(now - Duration::hours(1))
        .bind(now + Duration::hours(1))
        .fetch_one(pool)
        .await
        .expect("Failed to seed contest")
    }

    /// Create a pending submission with `test_count` tracked test cases,
    /// returning it together with its tracking tokens
    pub async fn pending_submission(
        pool: &PgPool,
        user_id: &Uuid,
        problem_id: &Uuid,
        test_count: usize,
    ) -> (Submission, Vec<String>) {
        let tokens: Vec<String> = (0..test_count)
            .map(|_| Uuid::new_v4().to_string())
            .collect();

        let submission = SubmissionRepository::create_with_tests(
            pool,
            user_id,
            problem_id,
            None,
            71,
            "code",
            "full code",
            &tokens,
        )
        .await
        .expect("Failed to seed submission");

        (submission, tokens)
    }
}
