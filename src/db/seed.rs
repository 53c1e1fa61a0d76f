//! First-start seed data for the Italian Alps map.
//!
//! Runs only when the `categories` table is empty; everything happens inside
//! one transaction so a partial seed never persists.

use crate::models::Coordinates;
use sqlx::{SqliteConnection, SqlitePool};

use super::poi_queries::{self, NewPoi};

struct SeedPoi {
    name: &'static str,
    lat: f64,
    lng: f64,
    description: &'static str,
    url: &'static str,
    path: &'static [(f64, f64)],
}

const fn poi(
    name: &'static str,
    lat: f64,
    lng: f64,
    description: &'static str,
    url: &'static str,
) -> SeedPoi {
    SeedPoi {
        name,
        lat,
        lng,
        description,
        url,
        path: &[],
    }
}

const CATEGORIES: [(&str, &str); 9] = [
    ("huts", "Mountain Huts"),
    ("trails", "Family Hiking Trails"),
    ("cableCars", "Cable Cars"),
    ("playgrounds", "Playgrounds"),
    ("adventureParks", "Adventure Parks"),
    ("bikeRentals", "Bike Rentals"),
    ("restaurants", "Restaurants"),
    ("nature", "Lakes & Waterfalls"),
    ("museums", "Children's Museums"),
];

const HUTS: [SeedPoi; 5] = [
    poi(
        "Rifugio Brentei",
        46.1937,
        10.8758,
        "Family-friendly mountain hut in the Brenta Dolomites at 2182m",
        "https://www.rifugiobrentei.it",
    ),
    poi(
        "Rifugio Graffer",
        46.2233,
        10.8592,
        "Easy access hut at 2261m, perfect for families with children",
        "https://www.dossdelSabion.it/rifugio-graffer/",
    ),
    poi(
        "Rifugio Tuckett",
        46.1925,
        10.8691,
        "Historic mountain hut with panoramic views of the Brenta Dolomites",
        "https://www.rifugiotuckett.it",
    ),
    poi(
        "Rifugio Capanna Presena",
        46.2286,
        10.58,
        "Accessible by cable car, spectacular views at 2730m",
        "https://www.pontedilegnotonale.com/en/capanna-presena/",
    ),
    poi(
        "Rifugio Contrin",
        46.4242,
        11.8008,
        "Easy access mountain hut ideal for families, great food",
        "https://www.rifugiocontrin.it",
    ),
];

const TRAILS: [SeedPoi; 8] = [
    SeedPoi {
        name: "Vallesinella Waterfall Trail",
        lat: 46.2247,
        lng: 10.8414,
        description: "Easy 2.5km trail with beautiful waterfalls, perfect for families. Dog-friendly path.",
        url: "https://www.visittrentino.info/en/experience/vallesinella-waterfalls",
        path: &[
            (46.2247, 10.8414),
            (46.2233, 10.8426),
            (46.2215, 10.8443),
            (46.2207, 10.8464),
            (46.2199, 10.8483),
            (46.2185, 10.8497),
        ],
    },
    SeedPoi {
        name: "Lago Nambino Family Trail",
        lat: 46.2361,
        lng: 10.8107,
        description: "Easy 1-hour circular walk around beautiful alpine lake with a restaurant.",
        url: "https://www.visittrentino.info/en/experience/lake-nambino",
        path: &[
            (46.2361, 10.8107),
            (46.2373, 10.8093),
            (46.2385, 10.8081),
            (46.2386, 10.8105),
            (46.2372, 10.8125),
            (46.2361, 10.8107),
        ],
    },
    SeedPoi {
        name: "Cinque Laghi Trail",
        lat: 46.2433,
        lng: 10.8297,
        description: "Moderate 11km trail passing five stunning alpine lakes. Family-friendly with resting points.",
        url: "https://www.campigliodolomiti.it/en/experience/five-lakes-hike",
        path: &[
            (46.2433, 10.8297),
            (46.2456, 10.8334),
            (46.2469, 10.8375),
            (46.2487, 10.8398),
            (46.2502, 10.8423),
            (46.2518, 10.8455),
            (46.2522, 10.8476),
        ],
    },
    SeedPoi {
        name: "Ritort Valley Family Trail",
        lat: 46.2337,
        lng: 10.8362,
        description: "Easy 3.5km path through meadows and forest with panoramic views, suitable for all ages.",
        url: "https://www.campigliodolomiti.it/en/activity/val-ritort-family-hike",
        path: &[
            (46.2337, 10.8362),
            (46.2349, 10.8379),
            (46.2367, 10.8394),
            (46.2381, 10.8421),
            (46.2395, 10.8445),
        ],
    },
    SeedPoi {
        name: "Sentiero dei Fiori",
        lat: 46.2352,
        lng: 10.5719,
        description: "Historic high-altitude path with WWI remains and stunning views, accessible via cable car.",
        url: "https://www.pontedilegnotonale.com/en/sentiero-dei-fiori-path-of-flowers",
        path: &[
            (46.2352, 10.5719),
            (46.2371, 10.5734),
            (46.2397, 10.5751),
            (46.2412, 10.5778),
            (46.2425, 10.5802),
            (46.2439, 10.5823),
        ],
    },
    SeedPoi {
        name: "Val di Sole Family Walk",
        lat: 46.3197,
        lng: 10.6891,
        description: "Easy 4km path along the Noce River with playgrounds and picnic areas.",
        url: "https://www.valdisole.net/en/Family-Trails.html",
        path: &[
            (46.3197, 10.6891),
            (46.3212, 10.6922),
            (46.3225, 10.6955),
            (46.3246, 10.6984),
            (46.3267, 10.7012),
        ],
    },
    SeedPoi {
        name: "Lago dei Caprioli Trail",
        lat: 46.2903,
        lng: 10.7614,
        description: "Easy lakeside trail with mountain views and wildlife spotting opportunities.",
        url: "https://www.valdisole.net/en/Lago-dei-Caprioli.html",
        path: &[
            (46.2903, 10.7614),
            (46.2918, 10.7638),
            (46.2932, 10.7662),
            (46.2941, 10.7687),
            (46.2935, 10.7711),
            (46.2920, 10.7698),
            (46.2908, 10.7675),
            (46.2903, 10.7643),
            (46.2903, 10.7614),
        ],
    },
    SeedPoi {
        name: "Lago Fedaia Circuit",
        lat: 46.4567,
        lng: 11.866,
        description: "Easy family walk around Lago Fedaia with Marmolada views and rest areas.",
        url: "https://www.dolomiti.it/en/marmolada/fedaia-lake",
        path: &[
            (46.4567, 11.8660),
            (46.4580, 11.8695),
            (46.4589, 11.8744),
            (46.4578, 11.8787),
            (46.4559, 11.8748),
            (46.4567, 11.8660),
        ],
    },
];

const CABLE_CARS: [SeedPoi; 4] = [
    poi(
        "Cabinovia Grostè",
        46.2313,
        10.8371,
        "Access to spectacular viewpoints and easy hiking trails",
        "https://www.campigliodolomiti.it/en/article/detail/cabinovia-groste",
    ),
    poi(
        "Cabinovia Spinale",
        46.2306,
        10.8261,
        "Easy access to Rifugio Graffer and panoramic views",
        "https://www.campigliodolomiti.it/en/article/detail/cabinovia-spinale",
    ),
    poi(
        "Funivia Paradiso",
        46.2593,
        10.5825,
        "Access to Presena Glacier and family-friendly summer activities",
        "https://www.pontedilegnotonale.com/en/paradiso-cable-car/",
    ),
    poi(
        "Funivia Marmolada",
        46.4336,
        11.8503,
        "Italy's highest cable car to Punta Rocca (3265m), breathtaking views",
        "https://www.funiviamarmolada.com",
    ),
];

const PLAYGROUNDS: [SeedPoi; 3] = [
    poi(
        "Parco Giochi Campiglio",
        46.2293,
        10.8265,
        "Central playground with swings, slides and climbing structures",
        "https://www.campigliodolomiti.it",
    ),
    poi(
        "Family Park Spinale",
        46.2366,
        10.8217,
        "High-altitude playground accessible via Spinale cable car",
        "https://www.campigliodolomiti.it/en/family",
    ),
    poi(
        "Fantaski Summer Park",
        46.2628,
        10.5882,
        "Summer activities for children including trampolines and games",
        "https://www.pontedilegnotonale.com/en/fantaski-park/",
    ),
];

const ADVENTURE_PARKS: [SeedPoi; 2] = [
    poi(
        "Flying Park",
        46.3034,
        10.7726,
        "Adventure park with zip lines and rope courses for all ages",
        "https://www.flyingpark.it",
    ),
    poi(
        "Adventure Dolomiti",
        46.2311,
        10.8339,
        "Tree-top adventure trails with courses for young children",
        "https://www.adventuredolomiti.it",
    ),
];

const BIKE_RENTALS: [SeedPoi; 2] = [
    poi(
        "Noleggio Bici Campiglio",
        46.2295,
        10.8251,
        "Bike rental with children's bikes, trailers and e-bikes",
        "https://www.campigliodolomiti.it/en/bike",
    ),
    poi(
        "Rent Bike Val di Sole",
        46.3198,
        10.6904,
        "Family bike rental along the Val di Sole cycle path",
        "https://www.valdisole.net/en/bike-rental",
    ),
];

const RESTAURANTS: [SeedPoi; 3] = [
    poi(
        "Malga Ritorto",
        46.2271,
        10.8132,
        "Authentic mountain restaurant with panoramic terrace and local cuisine",
        "https://www.malgaritorto.it",
    ),
    poi(
        "Chalet Fiat",
        46.2375,
        10.8216,
        "Family-friendly restaurant with playground and stunning views",
        "https://www.campigliodolomiti.it/en/article/detail/chalet-fiat",
    ),
    poi(
        "Ristorante Paradiso",
        46.2294,
        10.5801,
        "High-altitude restaurant with kid's menu and glacier views",
        "https://www.pontedilegnotonale.com/en/restaurant-paradiso/",
    ),
];

const NATURE: [SeedPoi; 3] = [
    poi(
        "Cascata Nardis",
        46.1875,
        10.7779,
        "Impressive 130m waterfall in Val Genova, easy access path",
        "https://www.campigliodolomiti.it/en/article/detail/nardis-waterfall",
    ),
    poi(
        "Lago di Nambino",
        46.2361,
        10.8107,
        "Picturesque alpine lake with easy walking trail and restaurant",
        "https://www.campigliodolomiti.it/en/article/detail/lake-nambino",
    ),
    poi(
        "Cascate del Saent",
        46.3689,
        10.6903,
        "Series of beautiful waterfalls with observation platforms",
        "https://www.valdisole.net/en/Waterfalls-Saent.html",
    ),
];

const MUSEUMS: [SeedPoi; 2] = [
    poi(
        "MUSE Trento",
        46.0618,
        11.1166,
        "Interactive science museum with special activities for children",
        "https://www.muse.it/en/",
    ),
    poi(
        "Museo della Guerra Bianca",
        46.3024,
        10.5639,
        "Museum about World War I in the Alps with kid-friendly exhibits",
        "https://www.museoguerrabianca.it",
    ),
];

struct SeedAirbnb {
    name: &'static str,
    lat: f64,
    lng: f64,
    price: i64,
    description: &'static str,
    url: &'static str,
    bedrooms: i64,
    image_url: &'static str,
}

const AIRBNBS: [SeedAirbnb; 5] = [
    SeedAirbnb {
        name: "Mountain View Apartment",
        lat: 46.2302,
        lng: 10.8248,
        price: 120,
        description: "Cozy 2-bedroom apartment in the heart of Madonna di Campiglio",
        url: "https://www.airbnb.com/rooms/12345",
        bedrooms: 2,
        image_url: "https://images.unsplash.com/photo-1568605114967-8130f3a36994",
    },
    SeedAirbnb {
        name: "Alpine Family Chalet",
        lat: 46.2328,
        lng: 10.8294,
        price: 180,
        description: "Spacious 3-bedroom chalet with garden, perfect for families",
        url: "https://www.airbnb.com/rooms/23456",
        bedrooms: 3,
        image_url: "https://images.unsplash.com/photo-1512917774080-9991f1c4c750",
    },
    SeedAirbnb {
        name: "Dolomites Panorama Loft",
        lat: 46.2356,
        lng: 10.8164,
        price: 150,
        description: "Modern 2-bedroom loft with breathtaking mountain views",
        url: "https://www.airbnb.com/rooms/34567",
        bedrooms: 2,
        image_url: "https://images.unsplash.com/photo-1600596542815-ffad4c1539a9",
    },
    SeedAirbnb {
        name: "Passo del Tonale Ski Apartment",
        lat: 46.2632,
        lng: 10.5841,
        price: 95,
        description: "Convenient 1-bedroom apartment near lifts and family activities",
        url: "https://www.airbnb.com/rooms/45678",
        bedrooms: 1,
        image_url: "https://images.unsplash.com/photo-1600607687939-ce8a6c25118c",
    },
    SeedAirbnb {
        name: "Marmolada View Suite",
        lat: 46.4502,
        lng: 11.8473,
        price: 130,
        description: "Elegant 2-bedroom apartment with stunning glacier views",
        url: "https://www.airbnb.com/rooms/67890",
        bedrooms: 2,
        image_url: "https://images.unsplash.com/photo-1600210492493-0946911123ea",
    },
];

async fn insert_seed_pois(
    conn: &mut SqliteConnection,
    category_id: i64,
    pois: &[SeedPoi],
) -> Result<(), sqlx::Error> {
    for seed in pois {
        let mut new_poi = NewPoi::new(
            seed.name,
            Coordinates {
                lat: seed.lat,
                lng: seed.lng,
            },
            category_id,
        );
        new_poi.description = Some(seed.description.to_string());
        new_poi.url = Some(seed.url.to_string());
        if !seed.path.is_empty() {
            new_poi.path = Some(
                seed.path
                    .iter()
                    .map(|&(lat, lng)| Coordinates { lat, lng })
                    .collect(),
            );
        }
        poi_queries::insert_poi(conn, &new_poi).await?;
    }
    Ok(())
}

/// Populate the database with default data when it is empty.
/// Returns whether seeding ran.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    if poi_queries::category_count(pool).await? > 0 {
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    let mut category_ids = std::collections::HashMap::new();
    for (name, display_name) in CATEGORIES {
        let id = poi_queries::insert_category(&mut tx, name, display_name).await?;
        category_ids.insert(name, id);
    }

    let groups: [(&str, &[SeedPoi]); 9] = [
        ("huts", &HUTS),
        ("trails", &TRAILS),
        ("cableCars", &CABLE_CARS),
        ("playgrounds", &PLAYGROUNDS),
        ("adventureParks", &ADVENTURE_PARKS),
        ("bikeRentals", &BIKE_RENTALS),
        ("restaurants", &RESTAURANTS),
        ("nature", &NATURE),
        ("museums", &MUSEUMS),
    ];
    for (category, pois) in groups {
        insert_seed_pois(&mut tx, category_ids[category], pois).await?;
    }

    for listing in &AIRBNBS {
        sqlx::query(
            "INSERT INTO airbnbs (name, lat, lng, price, description, url, bedrooms, image_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(listing.name)
        .bind(listing.lat)
        .bind(listing.lng)
        .bind(listing.price)
        .bind(listing.description)
        .bind(listing.url)
        .bind(listing.bedrooms)
        .bind(listing.image_url)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!("Database initialized with default data");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::setup_test_pool;

    #[tokio::test]
    async fn seed_runs_once() {
        let pool = setup_test_pool().await;

        assert!(seed_if_empty(&pool).await.unwrap());
        assert!(!seed_if_empty(&pool).await.unwrap());

        let categories = poi_queries::all_categories(&pool).await.unwrap();
        assert_eq!(categories.len(), 9);

        let trails_id = poi_queries::trails_category_id(&pool).await.unwrap().unwrap();
        let trails = poi_queries::pois_in_category(&pool, trails_id).await.unwrap();
        assert_eq!(trails.len(), 8);
        // Seeded trails start unrated
        assert!(trails.iter().all(|t| t.rating_count == 0 && t.difficulty_rating == 0.0));
        // Trail paths survive the JSON round trip
        assert!(trails.iter().all(|t| t.path.as_ref().is_some_and(|p| p.len() >= 5)));
    }
}
