use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use restaurant_directory::{
    config::AppConfig,
    db::{KeyValueStore, open_storage},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        dishes::UpdateDishRequest,
        restaurants::{CreateRestaurantRequest, UpdateRestaurantRequest},
        reviews::UpdateReviewRequest,
    },
    error::{AppError, AppResult},
    state::AppState,
    validation::parse_price,
    view::{NoticeLevel, PendingDeletion, Screen, ViewController},
};

const HELP: &str = "\
commands (fields separated by '|'):
  register NAME|EMAIL|PASSWORD|CONFIRM     login EMAIL PASSWORD     logout
  show-login | show-register               list | back              open N
  add-restaurant NAME|DESCRIPTION|CATEGORY|LOCATION[|IMAGE]         delete-restaurant N
  edit-restaurant N NAME|DESCRIPTION|CATEGORY|LOCATION|IMAGE (blank keeps)
  dish-form | cancel-dish | dish NAME|DESCRIPTION|PRICE|CATEGORY
  edit-dish N NAME|DESCRIPTION|PRICE|CATEGORY (blank keeps)         delete-dish N
  review-form | cancel-review | review RATING|COMMENT
  edit-review N RATING|COMMENT (blank keeps)                        delete-review N
  yes | no | help | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,restaurant_directory=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    let storage = open_storage(&config.storage_url).await?;
    let state = AppState::new(storage, config.auth);
    let mut view = ViewController::start(state).await?;

    println!("{HELP}");
    print_view(&mut view);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            _ => dispatch(&mut view, command, rest.trim()).await,
        }
        print_view(&mut view);
    }

    Ok(())
}

async fn dispatch<S: KeyValueStore>(view: &mut ViewController<S>, command: &str, rest: &str) {
    let fields: Vec<String> = rest.split('|').map(|f| f.trim().to_string()).collect();
    let field = |i: usize| fields.get(i).cloned().unwrap_or_default();

    match command {
        "register" => {
            view.register(RegisterRequest {
                name: field(0),
                email: field(1),
                password: field(2),
                confirm_password: field(3),
            })
            .await
        }
        "login" => {
            let mut parts = rest.split_whitespace();
            view.login(LoginRequest {
                email: parts.next().unwrap_or_default().to_string(),
                password: parts.next().unwrap_or_default().to_string(),
            })
            .await
        }
        "logout" => view.logout().await,
        "show-login" => view.show_login().await,
        "show-register" => view.show_register().await,
        "list" => view.refresh().await,
        "back" => view.back().await,
        "open" => {
            if let Some(id) = restaurant_at(view, rest) {
                view.open_restaurant(id).await;
            }
        }
        "add-restaurant" => {
            view.create_restaurant(CreateRestaurantRequest {
                name: field(0),
                description: field(1),
                category: field(2),
                location: field(3),
                image: fields.get(4).cloned(),
            })
            .await
        }
        "edit-restaurant" => {
            let (index, rest) = rest.split_once(' ').unwrap_or((rest, ""));
            let Some(id) = restaurant_at(view, index) else {
                return;
            };
            let fields = kept_fields(rest);
            let keep = |i: usize| fields.get(i).cloned().flatten();
            view.update_restaurant(
                id,
                UpdateRestaurantRequest {
                    name: keep(0),
                    description: keep(1),
                    category: keep(2),
                    location: keep(3),
                    image: keep(4),
                },
            )
            .await
        }
        "delete-restaurant" => {
            if let Some(id) = restaurant_at(view, rest) {
                view.request_deletion(PendingDeletion::Restaurant(id));
            }
        }
        "dish-form" => view.open_dish_form(),
        "cancel-dish" => view.cancel_dish_form(),
        "dish" => {
            if !view.dish_form().is_visible() {
                view.open_dish_form();
                if !view.dish_form().is_visible() {
                    return;
                }
            }
            let draft = view.dish_draft_mut();
            draft.name = field(0);
            draft.description = field(1);
            draft.price = field(2);
            draft.category = field(3);
            view.submit_dish_form().await;
        }
        "edit-dish" => {
            let (index, rest) = rest.split_once(' ').unwrap_or((rest, ""));
            let Some(id) = dish_at(view, index) else {
                return;
            };
            let fields = kept_fields(rest);
            let keep = |i: usize| fields.get(i).cloned().flatten();
            let price = match keep(2).map(|p| parse_price(&p)).transpose() {
                Ok(price) => price,
                Err(err) => {
                    view.notify_error(&err);
                    return;
                }
            };
            view.update_dish(
                id,
                UpdateDishRequest {
                    name: keep(0),
                    description: keep(1),
                    price,
                    category: keep(3),
                },
            )
            .await
        }
        "delete-dish" => {
            if let Some(id) = dish_at(view, rest) {
                view.request_deletion(PendingDeletion::Dish(id));
            }
        }
        "review-form" => view.open_review_form(),
        "cancel-review" => view.cancel_review_form(),
        "review" => {
            if !view.review_form().is_visible() {
                view.open_review_form();
                if !view.review_form().is_visible() {
                    return;
                }
            }
            match field(0).parse::<u8>() {
                Ok(rating) => view.select_rating(rating),
                Err(_) => view.review_draft_mut().rating = None,
            }
            view.review_draft_mut().comment = field(1);
            view.submit_review_form().await;
        }
        "edit-review" => {
            let (index, rest) = rest.split_once(' ').unwrap_or((rest, ""));
            let Some(id) = review_at(view, index) else {
                return;
            };
            let fields = kept_fields(rest);
            let keep = |i: usize| fields.get(i).cloned().flatten();
            let rating = match keep(0).map(|r| parse_rating(&r)).transpose() {
                Ok(rating) => rating,
                Err(err) => {
                    view.notify_error(&err);
                    return;
                }
            };
            view.update_review(
                id,
                UpdateReviewRequest {
                    rating,
                    comment: keep(1),
                },
            )
            .await
        }
        "delete-review" => {
            if let Some(id) = review_at(view, rest) {
                view.request_deletion(PendingDeletion::Review(id));
            }
        }
        "yes" => view.confirm_deletion().await,
        "no" => view.dismiss_deletion(),
        other => println!("unknown command '{other}', type 'help'"),
    }
}

fn parse_rating(raw: &str) -> AppResult<u8> {
    raw.parse::<u8>()
        .map_err(|_| AppError::validation("rating must be between 1 and 5"))
}

/// Splits edit input on '|'; blank fields keep the stored value.
fn kept_fields(raw: &str) -> Vec<Option<String>> {
    raw.split('|')
        .map(str::trim)
        .map(|f| (!f.is_empty()).then(|| f.to_string()))
        .collect()
}

fn position(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1)
}

fn restaurant_at<S: KeyValueStore>(view: &ViewController<S>, raw: &str) -> Option<Uuid> {
    let cards = match view.screen() {
        Screen::RestaurantList(cards) | Screen::AdminPanel(cards) => cards,
        Screen::RestaurantDetail(detail) => return Some(detail.restaurant.id),
        _ => return None,
    };
    position(raw).and_then(|i| cards.get(i)).map(|c| c.id)
}

fn dish_at<S: KeyValueStore>(view: &ViewController<S>, raw: &str) -> Option<Uuid> {
    match view.screen() {
        Screen::RestaurantDetail(detail) => position(raw)
            .and_then(|i| detail.dishes.get(i))
            .map(|d| d.id),
        _ => None,
    }
}

fn review_at<S: KeyValueStore>(view: &ViewController<S>, raw: &str) -> Option<Uuid> {
    match view.screen() {
        Screen::RestaurantDetail(detail) => position(raw)
            .and_then(|i| detail.reviews.get(i))
            .map(|r| r.id),
        _ => None,
    }
}

fn print_view<S: KeyValueStore>(view: &mut ViewController<S>) {
    for notice in view.take_notices() {
        match notice.level {
            NoticeLevel::Success => println!("✅ {}", notice.message),
            NoticeLevel::Error => println!("❌ {}", notice.message),
        }
    }

    match view.screen() {
        Screen::Register => println!("== Register =="),
        Screen::Login => println!("== Login =="),
        Screen::RestaurantList(cards) | Screen::AdminPanel(cards) => {
            let title = if matches!(view.screen(), Screen::AdminPanel(_)) {
                "Admin panel"
            } else {
                "Restaurants"
            };
            println!("== {title} ==");
            if cards.is_empty() {
                println!("  no restaurants yet");
            }
            for (i, card) in cards.iter().enumerate() {
                println!(
                    "  {}. {} {} [{}] ⭐ {} 📍 {}",
                    i + 1,
                    card.image,
                    card.name,
                    card.category,
                    card.rating,
                    card.location
                );
                println!("     {}", card.description);
            }
        }
        Screen::RestaurantDetail(detail) => {
            let r = &detail.restaurant;
            println!("== {} ({}) ⭐ {} ==", r.name, r.category, detail.average_rating);
            println!("  {}\n  📍 {}", r.description, r.location);
            println!("  Dishes:");
            if detail.dishes.is_empty() {
                println!("    none yet");
            }
            for (i, dish) in detail.dishes.iter().enumerate() {
                println!(
                    "    {}. {} {} [{}] {}",
                    i + 1,
                    dish.name,
                    dish.price,
                    dish.category,
                    dish.description
                );
            }
            println!("  Reviews:");
            if detail.reviews.is_empty() {
                println!("    none yet");
            }
            for (i, review) in detail.reviews.iter().enumerate() {
                let mine = if review.can_manage { " (yours)" } else { "" };
                println!(
                    "    {}. {} {} {}{}: {}",
                    i + 1,
                    review.stars,
                    review.author_name,
                    review.date,
                    mine,
                    review.comment
                );
            }
            if detail.can_add_dish {
                println!("  [dish-form] to add a dish");
            }
            if detail.can_add_review {
                println!("  [review-form] to write a review");
            }
        }
    }

    if let Some(pending) = view.pending_deletion() {
        println!("? {} (yes/no)", pending.prompt());
    }
}
