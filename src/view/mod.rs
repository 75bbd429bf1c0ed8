//! Section routing and user actions.
//!
//! Every action reports through a [`Notice`]; a failed action leaves the
//! section, the forms and the stored data as they were.

use uuid::Uuid;

use crate::{
    auth::{AuthUser, ensure_admin},
    db::KeyValueStore,
    dto::{
        auth::{LoginRequest, RegisterRequest},
        dishes::UpdateDishRequest,
        restaurants::{CreateRestaurantRequest, UpdateRestaurantRequest},
        reviews::UpdateReviewRequest,
    },
    error::{AppError, AppResult},
    response::ActionResponse,
    services::{
        auth_service::{SessionManager, SessionState},
        dish_service, restaurant_service, review_service,
    },
    state::AppState,
};

pub mod cards;
pub mod forms;

pub use cards::{DetailView, DishCard, RestaurantCard, ReviewCard, Screen};
pub use forms::{DishDraft, FormState, Notice, NoticeLevel, PendingDeletion, ReviewDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Register,
    Login,
    RestaurantList,
    AdminPanel,
    RestaurantDetail,
}

pub struct ViewController<S> {
    state: AppState<S>,
    session: SessionManager<S>,
    section: Section,
    screen: Screen,
    selected_restaurant: Option<Uuid>,
    dish_form: FormState<DishDraft>,
    review_form: FormState<ReviewDraft>,
    pending: Option<PendingDeletion>,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore> ViewController<S> {
    /// Restores the stored session and opens the section for its role.
    pub async fn start(state: AppState<S>) -> AppResult<Self> {
        let session = SessionManager::restore(state.clone()).await?;
        let mut controller = Self {
            state,
            session,
            section: Section::Register,
            screen: Screen::Register,
            selected_restaurant: None,
            dish_form: FormState::default(),
            review_form: FormState::default(),
            pending: None,
            notices: Vec::new(),
        };
        let landing = controller.landing();
        controller.show(landing).await;
        Ok(controller)
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    pub fn selected_restaurant(&self) -> Option<Uuid> {
        self.selected_restaurant
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn pending_deletion(&self) -> Option<PendingDeletion> {
        self.pending
    }

    pub fn dish_form(&self) -> &FormState<DishDraft> {
        &self.dish_form
    }

    pub fn review_form(&self) -> &FormState<ReviewDraft> {
        &self.review_form
    }

    fn landing(&self) -> Section {
        match self.session.state() {
            SessionState::Anonymous => Section::Register,
            SessionState::User => Section::RestaurantList,
            SessionState::Admin => Section::AdminPanel,
        }
    }

    fn home(&self) -> Section {
        if self.session.is_admin() {
            Section::AdminPanel
        } else {
            Section::RestaurantList
        }
    }

    /// Switches to `section` after rendering it from fresh queries.
    pub async fn show(&mut self, section: Section) {
        match self.render(section).await {
            Ok(screen) => {
                tracing::debug!(?section, "showing section");
                self.section = section;
                self.screen = screen;
            }
            Err(err) => self.notify_error(&err),
        }
    }

    /// Re-renders the current section.
    pub async fn refresh(&mut self) {
        self.show(self.section).await;
    }

    async fn render(&self, section: Section) -> AppResult<Screen> {
        match section {
            Section::Register => Ok(Screen::Register),
            Section::Login => Ok(Screen::Login),
            Section::RestaurantList => {
                self.session.require_user()?;
                Ok(Screen::RestaurantList(
                    cards::restaurant_cards(&self.state, false).await?,
                ))
            }
            Section::AdminPanel => {
                let user = self.session.require_user()?;
                ensure_admin(&user, "open the admin panel")?;
                Ok(Screen::AdminPanel(
                    cards::restaurant_cards(&self.state, true).await?,
                ))
            }
            Section::RestaurantDetail => {
                let user = self.session.require_user()?;
                let id = self
                    .selected_restaurant
                    .ok_or_else(|| AppError::not_found("Restaurant"))?;
                Ok(Screen::RestaurantDetail(
                    cards::detail_view(&self.state, id, &user).await?,
                ))
            }
        }
    }

    /// Reports a rejected action, including input refused before it reached a service.
    pub fn notify_error(&mut self, err: &AppError) {
        if err.is_internal() {
            tracing::error!(error = ?err, "action failed");
        } else {
            tracing::warn!(error = %err, "action rejected");
        }
        self.notices.push(Notice::error(err.user_message()));
    }

    fn report<T>(&mut self, result: AppResult<ActionResponse<T>>) -> Option<T> {
        match result {
            Ok(response) => {
                self.notices.push(Notice::success(response.message));
                Some(response.data)
            }
            Err(err) => {
                self.notify_error(&err);
                None
            }
        }
    }

    fn acting_user(&mut self) -> Option<AuthUser> {
        match self.session.require_user() {
            Ok(user) => Some(user),
            Err(err) => {
                self.notify_error(&err);
                None
            }
        }
    }

    pub async fn show_login(&mut self) {
        self.show(Section::Login).await;
    }

    pub async fn show_register(&mut self) {
        self.show(Section::Register).await;
    }

    pub async fn register(&mut self, payload: RegisterRequest) {
        let result = self.session.register(payload).await;
        if self.report(result).is_some() {
            self.reset_view_state();
            self.show(Section::Login).await;
        }
    }

    pub async fn login(&mut self, payload: LoginRequest) {
        let result = self.session.login(payload).await;
        if self.report(result).is_some() {
            self.reset_view_state();
            let landing = self.landing();
            self.show(landing).await;
        }
    }

    pub async fn logout(&mut self) {
        let result = self.session.logout().await;
        if self.report(result).is_some() {
            self.reset_view_state();
            self.show(Section::Login).await;
        }
    }

    fn reset_view_state(&mut self) {
        self.selected_restaurant = None;
        self.dish_form.cancel();
        self.review_form.cancel();
        self.pending = None;
    }

    pub async fn open_restaurant(&mut self, id: Uuid) {
        if let Err(err) = restaurant_service::get_restaurant(&self.state, id).await {
            self.notify_error(&err);
            return;
        }
        let previous = self.selected_restaurant.replace(id);
        self.show(Section::RestaurantDetail).await;
        if self.section != Section::RestaurantDetail {
            self.selected_restaurant = previous;
            return;
        }
        if previous != Some(id) {
            self.dish_form.cancel();
            self.review_form.cancel();
        }
    }

    /// Leaves the detail section for the role's home section.
    pub async fn back(&mut self) {
        let home = self.home();
        self.dish_form.cancel();
        self.review_form.cancel();
        self.show(home).await;
    }

    pub async fn create_restaurant(&mut self, payload: CreateRestaurantRequest) {
        let Some(user) = self.acting_user() else {
            return;
        };
        let result = restaurant_service::create_restaurant(&self.state, &user, payload).await;
        if self.report(result).is_some() {
            self.refresh().await;
        }
    }

    pub async fn update_restaurant(&mut self, id: Uuid, payload: UpdateRestaurantRequest) {
        let Some(user) = self.acting_user() else {
            return;
        };
        let result = restaurant_service::update_restaurant(&self.state, &user, id, payload).await;
        if self.report(result).is_some() {
            self.refresh().await;
        }
    }

    pub fn open_dish_form(&mut self) {
        if !self.session.is_admin() {
            self.notify_error(&AppError::forbidden(
                "You do not have permission to create dishes",
            ));
            return;
        }
        self.dish_form.open();
    }

    pub fn dish_draft_mut(&mut self) -> &mut DishDraft {
        self.dish_form.draft_mut()
    }

    pub fn cancel_dish_form(&mut self) {
        self.dish_form.cancel();
    }

    pub async fn submit_dish_form(&mut self) {
        let Some(user) = self.acting_user() else {
            return;
        };
        let result = match (self.selected_restaurant, self.dish_form.draft().to_request()) {
            (None, _) => Err(AppError::not_found("Restaurant")),
            (_, Err(err)) => Err(err),
            (Some(restaurant_id), Ok(payload)) => {
                dish_service::create_dish(&self.state, &user, restaurant_id, payload).await
            }
        };
        if self.report(result).is_some() {
            self.dish_form.cancel();
            self.refresh().await;
        }
    }

    pub async fn update_dish(&mut self, id: Uuid, payload: UpdateDishRequest) {
        let Some(user) = self.acting_user() else {
            return;
        };
        let result = dish_service::update_dish(&self.state, &user, id, payload).await;
        if self.report(result).is_some() {
            self.refresh().await;
        }
    }

    pub fn open_review_form(&mut self) {
        if self.session.is_admin() {
            self.notify_error(&AppError::forbidden("Administrators cannot write reviews"));
            return;
        }
        self.review_form.open();
    }

    pub fn review_draft_mut(&mut self) -> &mut ReviewDraft {
        self.review_form.draft_mut()
    }

    /// Star picker.
    pub fn select_rating(&mut self, rating: u8) {
        self.review_form.draft_mut().rating = Some(rating);
    }

    pub fn cancel_review_form(&mut self) {
        self.review_form.cancel();
    }

    pub async fn submit_review_form(&mut self) {
        let Some(user) = self.acting_user() else {
            return;
        };
        let result = match (self.selected_restaurant, self.review_form.draft().to_request()) {
            (None, _) => Err(AppError::not_found("Restaurant")),
            (_, Err(err)) => Err(err),
            (Some(restaurant_id), Ok(payload)) => {
                review_service::create_review(&self.state, &user, restaurant_id, payload).await
            }
        };
        if self.report(result).is_some() {
            self.review_form.cancel();
            self.refresh().await;
        }
    }

    pub async fn update_review(&mut self, id: Uuid, payload: UpdateReviewRequest) {
        let Some(user) = self.acting_user() else {
            return;
        };
        let result = review_service::update_review(&self.state, &user, id, payload).await;
        if self.report(result).is_some() {
            self.refresh().await;
        }
    }

    /// First step of a delete; nothing is written until [`Self::confirm_deletion`].
    pub fn request_deletion(&mut self, target: PendingDeletion) {
        self.pending = Some(target);
    }

    pub fn dismiss_deletion(&mut self) {
        self.pending = None;
    }

    pub async fn confirm_deletion(&mut self) {
        let Some(target) = self.pending.take() else {
            return;
        };
        let Some(user) = self.acting_user() else {
            return;
        };
        let done = match target {
            PendingDeletion::Restaurant(id) => {
                let result = restaurant_service::delete_restaurant(&self.state, &user, id).await;
                let done = self.report(result).is_some();
                if done && self.selected_restaurant == Some(id) {
                    self.selected_restaurant = None;
                    if self.section == Section::RestaurantDetail {
                        self.section = self.home();
                    }
                }
                done
            }
            PendingDeletion::Dish(id) => {
                let result = dish_service::delete_dish(&self.state, &user, id).await;
                self.report(result).is_some()
            }
            PendingDeletion::Review(id) => {
                let result = review_service::delete_review(&self.state, &user, id).await;
                self.report(result).is_some()
            }
        };
        if done {
            self.refresh().await;
        }
    }
}
