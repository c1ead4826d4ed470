use crate::entities::UserRole;
use crate::error::{AppError, AppResult};
use crate::utils::JwtService;
use crate::utils::order_status::Actor;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// The authenticated caller, stored in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_seller(&self) -> bool {
        self.role == UserRole::Seller
    }

    /// The side this user acts on when the endpoint is role-specific.
    pub fn actor(&self) -> Actor {
        match self.role {
            UserRole::Seller => Actor::Seller,
            UserRole::Buyer => Actor::Buyer,
        }
    }
}

pub fn current_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))
}

/// Like [`current_user`] for public routes that personalise when a token is sent.
pub fn optional_user(req: &HttpRequest) -> Option<AuthUser> {
    req.extensions().get::<AuthUser>().copied()
}

pub fn require_seller(req: &HttpRequest) -> AppResult<AuthUser> {
    let user = current_user(req)?;
    if !user.is_seller() {
        return Err(AppError::PermissionDenied);
    }
    Ok(user)
}

struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    /// Public for GET only; writes under these prefixes need a token.
    read_only_prefixes: Vec<&'static str>,
    /// Need a token even under a public prefix.
    excluded_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec![
                "/swagger-ui",
                "/swagger-ui/",
                "/api-docs/openapi.json",
                "/api/payments/midtrans/notification",
            ],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/api/auth/"],
            read_only_prefixes: vec!["/api/meals", "/api/reviews", "/api/geocode"],
            excluded_paths: vec!["/api/auth/logout", "/api/meals/seller"],
        }
    }

    fn is_public_path(&self, method: &Method, path: &str) -> bool {
        if self
            .excluded_paths
            .iter()
            .any(|&excluded| path.starts_with(excluded))
        {
            return false;
        }

        if self.exact_paths.contains(&path) {
            return true;
        }

        if self
            .prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
        {
            return true;
        }

        *method == Method::GET
            && self
                .read_only_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authenticate(jwt_service: &JwtService, token: &str) -> AppResult<AuthUser> {
    let claims = jwt_service.verify_access_token(token)?;
    Ok(AuthUser {
        id: claims.user_id()?,
        role: claims.role,
    })
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflight
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }

        let authenticated = bearer_token(&req).map(|token| authenticate(&self.jwt_service, token));

        if self.public_paths.is_public_path(req.method(), req.path()) {
            // a bad token on a public route is ignored
            if let Some(Ok(user)) = authenticated {
                req.extensions_mut().insert(user);
            }
            return Box::pin(self.service.call(req));
        }

        match authenticated {
            Some(Ok(user)) => {
                req.extensions_mut().insert(user);
                Box::pin(self.service.call(req))
            }
            Some(Err(e)) => {
                log::debug!("Rejected access token on {}: {e}", req.path());
                let error = AppError::AuthError("Invalid access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
            None => {
                let error = AppError::AuthError("Missing access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        let paths = PublicPaths::new();
        assert!(paths.is_public_path(&Method::POST, "/api/auth/login"));
        assert!(paths.is_public_path(&Method::POST, "/api/auth/refresh"));
        assert!(!paths.is_public_path(&Method::POST, "/api/auth/logout"));

        assert!(paths.is_public_path(&Method::GET, "/api/meals"));
        assert!(paths.is_public_path(&Method::GET, "/api/meals/12"));
        assert!(!paths.is_public_path(&Method::POST, "/api/meals"));
        assert!(!paths.is_public_path(&Method::PUT, "/api/meals/12"));
        assert!(!paths.is_public_path(&Method::GET, "/api/meals/seller"));

        assert!(paths.is_public_path(&Method::GET, "/api/reviews"));
        assert!(!paths.is_public_path(&Method::POST, "/api/reviews"));

        assert!(paths.is_public_path(&Method::POST, "/api/payments/midtrans/notification"));
        assert!(!paths.is_public_path(&Method::GET, "/api/orders/seller"));
        assert!(!paths.is_public_path(&Method::GET, "/api/transactions/user"));
        assert!(paths.is_public_path(&Method::GET, "/swagger-ui/index.html"));
    }

    #[test]
    fn test_authenticate() {
        let jwt = JwtService::new("secret", 60, 120);
        let token = jwt.generate_access_token(5, UserRole::Seller).unwrap();
        let user = authenticate(&jwt, &token).unwrap();
        assert_eq!(user, AuthUser { id: 5, role: UserRole::Seller });
        assert_eq!(user.actor(), Actor::Seller);

        let refresh = jwt.generate_refresh_token(5, UserRole::Seller).unwrap();
        assert!(authenticate(&jwt, &refresh).is_err());
    }
}
