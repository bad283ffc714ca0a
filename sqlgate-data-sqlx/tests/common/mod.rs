#![allow(dead_code)]

use sqlgate_core::{resolve, ConnectionConfig};
use sqlgate_data::{Entity, Value};
use sqlgate_data_sqlx::{connect, Pool, PoolSettings, Repository};

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct Car {
    pub id: i64,
    pub brand: String,
    pub color: String,
    pub year: i64,
    pub model: String,
}

impl Car {
    pub fn new(brand: &str, color: &str, year: i64, model: &str) -> Self {
        Self {
            id: 0,
            brand: brand.into(),
            color: color.into(),
            year,
            model: model.into(),
        }
    }
}

impl Entity for Car {
    type Id = i64;

    fn table_name() -> &'static str {
        "cars"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "brand", "color", "year", "model"]
    }

    fn id(&self) -> &i64 {
        &self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.brand.clone().into(),
            self.color.clone().into(),
            self.year.into(),
            self.model.clone().into(),
        ]
    }

    fn set_generated_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// A row with a nullable integer column.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct Reading {
    pub id: i64,
    pub sensor: String,
    pub value: Option<i64>,
}

impl Entity for Reading {
    type Id = i64;

    fn table_name() -> &'static str {
        "readings"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "sensor", "value"]
    }

    fn id(&self) -> &i64 {
        &self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![self.id.into(), self.sensor.clone().into(), self.value.into()]
    }

    fn set_generated_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// A table with nothing but its generated key.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct Ticket {
    pub id: i64,
}

impl Entity for Ticket {
    type Id = i64;

    fn table_name() -> &'static str {
        "tickets"
    }

    fn columns() -> &'static [&'static str] {
        &["id"]
    }

    fn id(&self) -> &i64 {
        &self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![self.id.into()]
    }

    fn set_generated_id(&mut self, id: i64) {
        self.id = id;
    }
}

pub const READINGS_DDL: &str = "CREATE TABLE readings (\
    id INTEGER PRIMARY KEY AUTOINCREMENT, \
    sensor TEXT NOT NULL, \
    value INTEGER)";

pub const TICKETS_DDL: &str = "CREATE TABLE tickets (id INTEGER PRIMARY KEY AUTOINCREMENT)";

pub const CARS_DDL: &str = "CREATE TABLE cars (\
    id INTEGER PRIMARY KEY AUTOINCREMENT, \
    brand TEXT NOT NULL, \
    color TEXT NOT NULL, \
    year INTEGER NOT NULL, \
    model TEXT NOT NULL)";

pub async fn memory_pool() -> Pool {
    let config = ConnectionConfig::new("sqlite").db_name(":memory:");
    let handle = resolve(&config).unwrap();
    let pool = connect(&handle, PoolSettings::from_config(&config))
        .await
        .unwrap();
    for ddl in [CARS_DDL, READINGS_DDL, TICKETS_DDL] {
        sqlx::query(ddl).execute(pool.any_pool()).await.unwrap();
    }
    pool
}

pub async fn setup() -> (Pool, Repository) {
    let pool = memory_pool().await;
    let repo = pool.repository();
    (pool, repo)
}

pub fn paginated_data() -> Vec<Car> {
    vec![
        Car::new("Toyota", "Red", 2020, "Corolla"),
        Car::new("Ford", "Blue", 2018, "Focus"),
        Car::new("Peugeot", "White", 2019, "208"),
        Car::new("Nissan", "Green", 2017, "Sentra"),
        Car::new("Mazda", "Gray", 2019, "3"),
    ]
}
