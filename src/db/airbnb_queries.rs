use crate::models::{Airbnb, Coordinates};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(sqlx::FromRow)]
struct AirbnbRow {
    id: i64,
    name: String,
    lat: f64,
    lng: f64,
    price: Option<i64>,
    description: Option<String>,
    url: Option<String>,
    bedrooms: Option<i64>,
    image_url: Option<String>,
}

impl AirbnbRow {
    fn into_airbnb(self) -> Airbnb {
        Airbnb {
            id: self.id,
            name: self.name,
            coordinates: Coordinates {
                lat: self.lat,
                lng: self.lng,
            },
            price: self.price,
            description: self.description,
            url: self.url,
            bedrooms: self.bedrooms,
            image_url: self.image_url,
        }
    }
}

const AIRBNB_COLUMNS: &str = "id, name, lat, lng, price, description, url, bedrooms, image_url";

pub async fn all_airbnbs(pool: &SqlitePool) -> Result<Vec<Airbnb>, sqlx::Error> {
    let sql = format!("SELECT {AIRBNB_COLUMNS} FROM airbnbs ORDER BY id");
    let rows: Vec<AirbnbRow> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(AirbnbRow::into_airbnb).collect())
}

pub async fn find_airbnb(pool: &SqlitePool, id: i64) -> Result<Option<Airbnb>, sqlx::Error> {
    let sql = format!("SELECT {AIRBNB_COLUMNS} FROM airbnbs WHERE id = ?1");
    let row: Option<AirbnbRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(AirbnbRow::into_airbnb))
}

/// Insert payload for a new listing.
pub struct NewAirbnb {
    pub name: String,
    pub coordinates: Coordinates,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub bedrooms: Option<i64>,
    pub image_url: Option<String>,
}

pub async fn insert_airbnb(
    conn: &mut SqliteConnection,
    airbnb: &NewAirbnb,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO airbnbs (name, lat, lng, price, description, url, bedrooms, image_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&airbnb.name)
    .bind(airbnb.coordinates.lat)
    .bind(airbnb.coordinates.lng)
    .bind(airbnb.price)
    .bind(&airbnb.description)
    .bind(&airbnb.url)
    .bind(airbnb.bedrooms)
    .bind(&airbnb.image_url)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}
