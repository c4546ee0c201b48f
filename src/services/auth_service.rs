use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{LoginRequest, LoginResponse, SignupRequest},
    error::{AppError, AppResult},
    events::{StoreEvent, StoreEvents},
    models::{Account, Role, SessionUser},
    response::{ApiResponse, Meta},
    store::{Record, SESSION_KEY, SharedStore, StoreError},
    state::AppState,
};

/// Known accounts plus the single remembered session of this profile.
///
/// The account list is in-memory only: accounts created by `signup` are
/// forgotten on restart, the session pointing at them is not.
#[derive(Clone)]
pub struct AccountManager {
    directory: Arc<RwLock<Vec<Account>>>,
    session: Record<SessionUser>,
    events: StoreEvents,
}

impl AccountManager {
    pub fn new(store: SharedStore, accounts: Vec<Account>, events: StoreEvents) -> Self {
        Self {
            directory: Arc::new(RwLock::new(accounts)),
            session: Record::new(store, SESSION_KEY),
            events,
        }
    }

    /// Exact email and password match. A miss says nothing about which
    /// half was wrong and leaves any existing session untouched.
    pub fn login(&self, email: &str, password: &str) -> Result<Option<Account>, StoreError> {
        let account = {
            let directory = self.directory.read().map_err(|_| StoreError::Poisoned)?;
            directory
                .iter()
                .find(|a| a.email == email && a.password == password)
                .cloned()
        };

        let Some(account) = account else {
            return Ok(None);
        };
        self.session.put(&SessionUser::from(&account))?;
        self.events.emit(StoreEvent::SessionChanged);
        Ok(Some(account))
    }

    /// Always succeeds. No duplicate-email check and no password policy.
    pub fn signup(&self, email: &str, password: &str, name: &str) -> Result<Account, StoreError> {
        let account = Account {
            id: format!("customer-{}", Uuid::new_v4().simple()),
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role: Role::Customer,
            vendor_brand: None,
        };

        self.directory
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(account.clone());
        self.session.put(&SessionUser::from(&account))?;
        self.events.emit(StoreEvent::SessionChanged);
        Ok(account)
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        self.session.delete()?;
        self.events.emit(StoreEvent::SessionChanged);
        Ok(())
    }

    pub fn current_session(&self) -> Result<Option<SessionUser>, StoreError> {
        self.session.get()
    }

    pub fn is_authenticated(&self) -> Result<bool, StoreError> {
        Ok(self.current_session()?.is_some())
    }

    pub fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        let directory = self.directory.read().map_err(|_| StoreError::Poisoned)?;
        Ok(directory.clone())
    }
}

pub fn signup_user(state: &AppState, payload: SignupRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let SignupRequest {
        email,
        password,
        name,
    } = payload;
    let account = state.accounts.signup(&email, &password, &name)?;

    log_audit(
        Some(&account.id),
        "user_signup",
        Some("accounts"),
        Some(serde_json::json!({ "email": account.email })),
    );

    let resp = LoginResponse {
        redirect: account.role.home_path().to_string(),
        user: SessionUser::from(&account),
    };
    Ok(ApiResponse::success("User created", resp, Some(Meta::empty())))
}

pub fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let account = match state.accounts.login(&email, &password)? {
        Some(account) => account,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    log_audit(
        Some(&account.id),
        "user_login",
        Some("accounts"),
        Some(serde_json::json!({ "role": account.role })),
    );

    let resp = LoginResponse {
        redirect: account.role.home_path().to_string(),
        user: SessionUser::from(&account),
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub fn logout_user(state: &AppState) -> AppResult<ApiResponse<serde_json::Value>> {
    let previous = state.accounts.current_session()?;
    state.accounts.logout()?;

    if let Some(user) = previous {
        log_audit(Some(&user.id), "user_logout", Some("accounts"), None);
    }

    Ok(ApiResponse::success(
        "Logged out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub fn current_session(state: &AppState) -> AppResult<ApiResponse<SessionUser>> {
    let resp = match state.accounts.current_session()? {
        Some(user) => ApiResponse::success("Session", user, Some(Meta::empty())),
        None => ApiResponse::message_only("No session"),
    };
    Ok(resp)
}
