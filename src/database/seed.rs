use tracing::info;

use super::manager::DatabaseError;
use super::models::{NewCity, NewPointOfInterest};
use super::repository::CityInfoRepository;
use crate::filter::CityFilter;

struct SeedCity {
    name: &'static str,
    description: &'static str,
    points_of_interest: &'static [(&'static str, &'static str)],
}

const SEED_CITIES: &[SeedCity] = &[
    SeedCity {
        name: "New York City",
        description: "The one with the big park.",
        points_of_interest: &[
            ("Central Park", "The most visited urban park in the United States."),
            ("Empire State Building", "A 102-story skyscraper located in Midtown Manhattan."),
        ],
    },
    SeedCity {
        name: "Antwerp",
        description: "The one with the cathedral that was never really finished.",
        points_of_interest: &[
            ("Cathedral of Our Lady", "A Gothic style cathedral, conceived by architects Jan and Pieter Appelmans."),
            ("Antwerp Central Station", "The finest example of railway architecture in Belgium."),
        ],
    },
    SeedCity {
        name: "Paris",
        description: "The one with the big tower.",
        points_of_interest: &[
            ("Eiffel Tower", "A wrought iron lattice tower on the Champ de Mars."),
            ("The Louvre", "The world's largest museum."),
        ],
    },
];

/// Insert the sample cities when the store is empty. Safe to call on every start.
pub async fn seed_cities(repo: &dyn CityInfoRepository) -> Result<(), DatabaseError> {
    if repo.count_cities(&CityFilter::default()).await? > 0 {
        info!("Database already contains cities, skipping seed data");
        return Ok(());
    }

    for seed in SEED_CITIES {
        let city = repo
            .create_city(NewCity {
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
            })
            .await?;

        for (name, description) in seed.points_of_interest {
            repo.add_point_of_interest(
                city.id,
                NewPointOfInterest {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                },
            )
            .await?;
        }
    }

    info!("Seeded {} cities", SEED_CITIES.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryRepository;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let repo = MemoryRepository::new();
        seed_cities(&repo).await.unwrap();
        seed_cities(&repo).await.unwrap();

        assert_eq!(repo.count_cities(&CityFilter::default()).await.unwrap(), 3);
        let paris = repo
            .list_cities(&CityFilter::new(Some("Paris"), None), crate::pagination::PageRequest { page_number: 1, page_size: 10 })
            .await
            .unwrap();
        let pois = repo.get_points_of_interest(paris[0].id).await.unwrap();
        assert_eq!(pois.len(), 2);
    }
}
