use sqlgate::prelude::*;
use sqlgate::{ConfigError, Value};

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
struct Note {
    id: i64,
    body: String,
}

impl Entity for Note {
    type Id = i64;

    fn table_name() -> &'static str {
        "notes"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "body"]
    }

    fn id(&self) -> &i64 {
        &self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![self.id.into(), self.body.clone().into()]
    }

    fn set_generated_id(&mut self, id: i64) {
        self.id = id;
    }
}

async fn memory_client() -> Client {
    let client = Client::connect(&ConnectionConfig::new("sqlite").db_name(":memory:"))
        .await
        .unwrap();
    sqlx::query("CREATE TABLE notes (id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT NOT NULL)")
        .execute(client.pool().any_pool())
        .await
        .unwrap();
    client
}

#[tokio::test]
async fn test_connect_and_use_repository() {
    let client = memory_client().await;
    let ctx = OpContext::background();
    assert_eq!(client.driver(), Driver::Sqlite);
    client.health_check().await.unwrap();

    let mut note = Note {
        body: "hello".into(),
        ..Default::default()
    };
    client.repo().create(&ctx, &mut note).await.unwrap();
    assert_eq!(client.repo().get_all::<Note>(&ctx).await.unwrap(), vec![note]);
}

#[tokio::test]
async fn test_validation_fails_before_io() {
    let err = Client::connect(&ConnectionConfig::new("postgres").port(5432))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Connect(ref e) if e.is_validation()));
    assert_eq!(err.to_string(), "missing Host for Postgres connection");

    let err = Client::connect(&ConnectionConfig::new("invalid")).await.unwrap_err();
    assert_eq!(err.to_string(), "unsupported driver: invalid");
}

#[tokio::test]
async fn test_from_config() {
    let config = SqlgateConfig::from_yaml_str(
        "datasource:\n  driver: sqlite\n  database: \":memory:\"\n  pool:\n    maxopen: 4\n",
        "test",
    )
    .unwrap();
    let client = Client::from_config(&config).await.unwrap();
    assert_eq!(client.pool().settings().max_open_conns, 4);
    client.close().await;
}

#[tokio::test]
async fn test_from_config_without_datasource() {
    let err = Client::from_config(&SqlgateConfig::empty()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Connect(ConnectError::Config(ConfigError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_close_twice() {
    let client = memory_client().await;
    client.close().await;
    client.close().await;
    assert!(client.pool().is_closed());
    assert!(matches!(client.health_check().await, Err(Error::Data(_))));
}

#[tokio::test]
async fn test_transaction_with_facade_error() {
    let client = memory_client().await;
    let ctx = OpContext::background();

    let inner_ctx = ctx.clone();
    let result: Result<(), Error> = client
        .repo()
        .transaction(&ctx, |tx| async move {
            let mut note = Note {
                body: "draft".into(),
                ..Default::default()
            };
            tx.create(&inner_ctx, &mut note).await?;
            Err::<(), _>(Error::Data(DataError::Other("abandoned".into())))
        })
        .await;
    assert!(result.is_err());
    assert_eq!(client.repo().count::<Note>(&ctx).await.unwrap(), 0);
}
