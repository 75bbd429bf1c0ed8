mod common;

use restaurant_directory::{
    db::MemoryStore,
    dto::dishes::UpdateDishRequest,
    models::AverageRating,
    services::auth_service::SessionState,
    state::AppState,
    view::{DetailView, PendingDeletion, RestaurantCard, Screen, Section, ViewController},
};

use common::{login_request, memory_state, register_request, restaurant_request};

async fn signed_in(
    state: &AppState<MemoryStore>,
    name: &str,
    email: &str,
) -> anyhow::Result<ViewController<MemoryStore>> {
    let mut view = ViewController::start(state.clone()).await?;
    view.register(register_request(name, email)).await;
    view.login(login_request(email)).await;
    Ok(view)
}

fn detail(view: &ViewController<MemoryStore>) -> &DetailView {
    match view.screen() {
        Screen::RestaurantDetail(detail) => detail,
        other => panic!("expected detail screen, got {other:?}"),
    }
}

fn cards(view: &ViewController<MemoryStore>) -> &[RestaurantCard] {
    match view.screen() {
        Screen::RestaurantList(cards) | Screen::AdminPanel(cards) => cards,
        other => panic!("expected a restaurant list, got {other:?}"),
    }
}

#[tokio::test]
async fn anonymous_start_lands_on_register_and_walks_to_admin_panel() -> anyhow::Result<()> {
    let state = memory_state();
    let mut view = ViewController::start(state.clone()).await?;
    assert_eq!(view.section(), Section::Register);
    assert_eq!(view.session().state(), SessionState::Anonymous);

    view.register(register_request("Ada Admin", "ada@example.com")).await;
    assert_eq!(view.section(), Section::Login);
    let notice = view.last_notice().expect("registration notice");
    assert!(!notice.is_error());
    assert!(notice.message.contains("Administrator"));

    view.login(login_request("ada@example.com")).await;
    assert_eq!(view.section(), Section::AdminPanel);
    assert!(view.session().is_admin());
    assert!(cards(&view).is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_actions_keep_the_section_and_report_an_error() -> anyhow::Result<()> {
    let state = memory_state();
    let mut view = ViewController::start(state.clone()).await?;

    view.register(register_request("Al", "al@example.com")).await;
    assert_eq!(view.section(), Section::Register);
    assert!(view.last_notice().expect("notice").is_error());

    view.show_login().await;
    view.login(login_request("nobody@example.com")).await;
    assert_eq!(view.section(), Section::Login);
    assert!(view.last_notice().expect("notice").is_error());

    view.show(Section::RestaurantList).await;
    assert_eq!(view.section(), Section::Login);
    assert!(view.last_notice().expect("notice").is_error());
    Ok(())
}

#[tokio::test]
async fn admin_and_user_see_different_detail_controls() -> anyhow::Result<()> {
    let state = memory_state();
    let mut admin = signed_in(&state, "Ada Admin", "ada@example.com").await?;
    admin.create_restaurant(restaurant_request("Corner Cantina")).await;
    let restaurant_id = cards(&admin)[0].id;
    assert!(cards(&admin)[0].can_manage);
    assert_eq!(cards(&admin)[0].image, "🍽️");
    assert_eq!(cards(&admin)[0].rating, AverageRating::Unrated);

    admin.open_restaurant(restaurant_id).await;
    assert_eq!(admin.section(), Section::RestaurantDetail);
    assert!(detail(&admin).can_add_dish);
    assert!(!detail(&admin).can_add_review);

    admin.open_review_form();
    assert!(!admin.review_form().is_visible());
    assert!(admin.last_notice().expect("notice").is_error());

    admin.open_dish_form();
    {
        let draft = admin.dish_draft_mut();
        draft.name = "Quesadilla".into();
        draft.description = "Cheese".into();
        draft.price = "4.5".into();
        draft.category = "Mains".into();
    }
    admin.submit_dish_form().await;
    assert!(!admin.dish_form().is_visible());
    assert_eq!(detail(&admin).dishes.len(), 1);
    assert_eq!(detail(&admin).dishes[0].price, "$4.50");

    admin.back().await;
    assert_eq!(admin.section(), Section::AdminPanel);

    let mut user = signed_in(&state, "Uma User", "uma@example.com").await?;
    assert_eq!(user.section(), Section::RestaurantList);
    assert!(!cards(&user)[0].can_manage);

    user.open_restaurant(restaurant_id).await;
    assert!(!detail(&user).can_add_dish);
    assert!(detail(&user).can_add_review);
    assert!(!detail(&user).dishes[0].can_manage);

    user.open_dish_form();
    assert!(!user.dish_form().is_visible());
    assert!(user.last_notice().expect("notice").is_error());

    user.open_review_form();
    user.select_rating(4);
    user.review_draft_mut().comment = "Great cheese".into();
    user.submit_review_form().await;
    assert!(!user.review_form().is_visible());
    let reviews = &detail(&user).reviews;
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].stars, "⭐⭐⭐⭐");
    assert!(reviews[0].can_manage);
    assert_eq!(detail(&user).average_rating.to_string(), "4.0");

    user.back().await;
    assert_eq!(user.section(), Section::RestaurantList);
    Ok(())
}

#[tokio::test]
async fn cancelling_forms_writes_nothing() -> anyhow::Result<()> {
    let state = memory_state();
    let mut admin = signed_in(&state, "Ada Admin", "ada@example.com").await?;
    admin.create_restaurant(restaurant_request("Quiet Spot")).await;
    let restaurant_id = cards(&admin)[0].id;

    let mut user = signed_in(&state, "Uma User", "uma@example.com").await?;
    user.open_restaurant(restaurant_id).await;
    user.open_review_form();
    user.select_rating(2);
    user.review_draft_mut().comment = "Meh".into();
    user.cancel_review_form();

    assert!(!user.review_form().is_visible());
    assert_eq!(user.review_form().draft().rating, None);
    assert!(state.store.reviews().find_all().await?.is_empty());

    user.open_review_form();
    user.review_draft_mut().comment = "No stars picked".into();
    user.submit_review_form().await;
    assert!(user.review_form().is_visible());
    let notice = user.last_notice().expect("notice");
    assert!(notice.is_error());
    assert!(notice.message.contains("rating"));
    assert!(state.store.reviews().find_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn deletions_wait_for_confirmation() -> anyhow::Result<()> {
    let state = memory_state();
    let mut admin = signed_in(&state, "Ada Admin", "ada@example.com").await?;
    admin.create_restaurant(restaurant_request("Short Lived")).await;
    let restaurant_id = cards(&admin)[0].id;

    admin.request_deletion(PendingDeletion::Restaurant(restaurant_id));
    assert_eq!(
        admin.pending_deletion().map(|p| p.prompt()),
        Some("Are you sure you want to delete this restaurant?")
    );
    admin.dismiss_deletion();
    assert_eq!(admin.pending_deletion(), None);
    assert_eq!(state.store.restaurants().find_all().await?.len(), 1);

    admin.open_restaurant(restaurant_id).await;
    admin.request_deletion(PendingDeletion::Restaurant(restaurant_id));
    admin.confirm_deletion().await;
    assert_eq!(admin.pending_deletion(), None);
    assert_eq!(admin.section(), Section::AdminPanel);
    assert_eq!(admin.selected_restaurant(), None);
    assert!(cards(&admin).is_empty());
    assert!(state.store.restaurants().find_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn dish_edits_refresh_the_detail_screen() -> anyhow::Result<()> {
    let state = memory_state();
    let mut admin = signed_in(&state, "Ada Admin", "ada@example.com").await?;
    admin.create_restaurant(restaurant_request("Edit House")).await;
    let restaurant_id = cards(&admin)[0].id;
    admin.open_restaurant(restaurant_id).await;
    admin.open_dish_form();
    {
        let draft = admin.dish_draft_mut();
        draft.name = "Flan".into();
        draft.description = "Caramel".into();
        draft.price = "3".into();
        draft.category = "Desserts".into();
    }
    admin.submit_dish_form().await;
    let dish_id = detail(&admin).dishes[0].id;

    admin
        .update_dish(
            dish_id,
            UpdateDishRequest {
                price: Some(3.75),
                ..Default::default()
            },
        )
        .await;
    assert_eq!(detail(&admin).dishes[0].price, "$3.75");

    admin.request_deletion(PendingDeletion::Dish(dish_id));
    admin.confirm_deletion().await;
    assert_eq!(admin.section(), Section::RestaurantDetail);
    assert!(detail(&admin).dishes.is_empty());
    Ok(())
}

#[tokio::test]
async fn restart_returns_to_the_role_landing_section() -> anyhow::Result<()> {
    let state = memory_state();
    let admin = signed_in(&state, "Ada Admin", "ada@example.com").await?;
    assert_eq!(admin.section(), Section::AdminPanel);
    drop(admin);

    let mut restarted = ViewController::start(state.clone()).await?;
    assert_eq!(restarted.section(), Section::AdminPanel);

    restarted.logout().await;
    assert_eq!(restarted.section(), Section::Login);

    let after_logout = ViewController::start(state.clone()).await?;
    assert_eq!(after_logout.section(), Section::Register);
    Ok(())
}
