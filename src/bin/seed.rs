use restaurant_directory::{
    auth::AuthUser,
    config::AppConfig,
    db::{KeyValueStore, open_storage},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        dishes::CreateDishRequest,
        restaurants::CreateRestaurantRequest,
    },
    error::AppError,
    models::Role,
    services::{auth_service::SessionManager, dish_service, restaurant_service},
    state::AppState,
};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin1234";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let storage = open_storage(&config.storage_url).await?;
    let state = AppState::new(storage, config.auth);
    seed(&state).await?;

    println!("Seed completed");
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum SeedOutcome {
    Seeded,
    AlreadySeeded,
    AdminTaken,
}

/// Signs the profile out; any session persisted before seeding is not kept.
async fn seed<S: KeyValueStore>(state: &AppState<S>) -> anyhow::Result<SeedOutcome> {
    let mut session = SessionManager::restore(state.clone()).await?;

    // The first account registered in an empty store becomes the administrator.
    ensure_user(&mut session, "Site Admin", ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    ensure_user(&mut session, "Regular User", "user@example.com", "user12345").await?;

    let admin = session
        .login(LoginRequest {
            email: ADMIN_EMAIL.into(),
            password: ADMIN_PASSWORD.into(),
        })
        .await?
        .into_data();
    let outcome = if admin.role != Role::Admin {
        println!(
            "{ADMIN_EMAIL} is a regular user because another account was registered first; \
             skipping restaurants"
        );
        SeedOutcome::AdminTaken
    } else if restaurant_service::list_restaurants(state).await?.is_empty() {
        seed_restaurants(state, &AuthUser::from(&admin)).await?;
        SeedOutcome::Seeded
    } else {
        println!("Restaurants already present, skipping");
        SeedOutcome::AlreadySeeded
    };
    session.logout().await?;
    Ok(outcome)
}

async fn ensure_user<S: KeyValueStore>(
    session: &mut SessionManager<S>,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let result = session
        .register(RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: password.into(),
        })
        .await;
    match result {
        Ok(resp) => println!("Ensured user {email} (role={})", resp.data.role),
        Err(AppError::Conflict(_)) => println!("User {email} already exists"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn seed_restaurants<S: KeyValueStore>(
    state: &AppState<S>,
    admin: &AuthUser,
) -> anyhow::Result<()> {
    let restaurants = vec![
        (
            "La Taquería",
            "Street-style tacos and aguas frescas",
            "Mexican",
            "Av. Reforma 120",
            "🌮",
            vec![
                ("Taco al pastor", "Marinated pork with pineapple", 3.5, "Tacos"),
                ("Horchata", "Rice and cinnamon drink", 2.0, "Drinks"),
            ],
        ),
        (
            "Trattoria Ferris",
            "Wood-fired pizza and fresh pasta",
            "Italian",
            "Calle Roma 7",
            "🍕",
            vec![
                ("Margherita", "Tomato, mozzarella and basil", 9.0, "Pizza"),
                ("Tagliatelle al ragù", "Slow-cooked beef ragù", 12.5, "Pasta"),
            ],
        ),
        (
            "Sushi Oxide",
            "Nigiri, rolls and ramen",
            "Japanese",
            "Paseo del Puerto 33",
            "🍣",
            vec![("Salmon nigiri", "Two pieces", 4.0, "Nigiri")],
        ),
    ];

    for (name, description, category, location, image, dishes) in restaurants {
        let restaurant = restaurant_service::create_restaurant(
            state,
            admin,
            CreateRestaurantRequest {
                name: name.into(),
                description: description.into(),
                category: category.into(),
                location: location.into(),
                image: Some(image.into()),
            },
        )
        .await?
        .into_data();

        for (dish_name, dish_description, price, dish_category) in dishes {
            dish_service::create_dish(
                state,
                admin,
                restaurant.id,
                CreateDishRequest {
                    name: dish_name.into(),
                    description: dish_description.into(),
                    price,
                    category: dish_category.into(),
                },
            )
            .await?;
        }
    }

    println!("Seeded restaurants");
    Ok(())
}
