//! Pure authorization policy.
//!
//! The decision of who may do what is a plain function over the principal
//! and the requested action, with no transport or store access, so the
//! whole capability matrix can be tested in isolation. Route handlers
//! obtain the principal via the session extractors and call
//! [`authorize`] before touching any repository.

use stockroom_core::UserId;

use crate::error::AppError;
use crate::models::session::CurrentUser;

/// An operation on an in-scope resource.
///
/// Owner-scoped actions carry the resource owner's ID so the policy can
/// compare it against the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read the product catalog (public).
    BrowseCatalog,
    /// Create, modify, or delete a product.
    ManageCatalog,
    /// Place an order for oneself.
    PlaceOrder,
    /// Read orders belonging to `owner`.
    ReadOrders { owner: UserId },
    /// Change an order's lifecycle status.
    ChangeOrderStatus,
    /// Delete the order owned by `owner`.
    DeleteOrder { owner: UserId },
}

/// Policy denial. Converts into the matching HTTP error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deny {
    /// Caller is anonymous.
    Unauthorized,
    /// Caller is authenticated but lacks role or ownership.
    Forbidden,
}

impl From<Deny> for AppError {
    fn from(deny: Deny) -> Self {
        match deny {
            Deny::Unauthorized => Self::Unauthorized,
            Deny::Forbidden => Self::Forbidden,
        }
    }
}

/// Decide whether `principal` may perform `action`.
///
/// `None` is the anonymous caller. Admins may perform every in-scope
/// action; owners may place orders and read or delete their own.
///
/// # Errors
///
/// Returns [`Deny::Unauthorized`] for anonymous callers on non-public
/// actions and [`Deny::Forbidden`] for authenticated callers without the
/// required role or ownership. The denial never reveals whether the
/// resource exists.
pub fn authorize(principal: Option<&CurrentUser>, action: Action) -> Result<(), Deny> {
    // The catalog is readable by everyone, including anonymous callers.
    if action == Action::BrowseCatalog {
        return Ok(());
    }

    let caller = principal.ok_or(Deny::Unauthorized)?;
    if caller.role.is_admin() {
        return Ok(());
    }

    match action {
        Action::BrowseCatalog => Ok(()),
        Action::PlaceOrder => Ok(()),
        Action::ReadOrders { owner } | Action::DeleteOrder { owner } if owner == caller.id => {
            Ok(())
        }
        Action::ManageCatalog
        | Action::ChangeOrderStatus
        | Action::ReadOrders { .. }
        | Action::DeleteOrder { .. } => Err(Deny::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{Email, Role};

    fn principal(id: i32, role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            name: "Test".to_string(),
            email: Email::parse("test@example.com").expect("valid email"),
            role,
        }
    }

    #[test]
    fn test_anonymous_may_browse_catalog() {
        assert_eq!(authorize(None, Action::BrowseCatalog), Ok(()));
    }

    #[test]
    fn test_anonymous_denied_everything_else() {
        let owner = UserId::new(1);
        for action in [
            Action::ManageCatalog,
            Action::PlaceOrder,
            Action::ReadOrders { owner },
            Action::ChangeOrderStatus,
            Action::DeleteOrder { owner },
        ] {
            assert_eq!(authorize(None, action), Err(Deny::Unauthorized));
        }
    }

    #[test]
    fn test_user_may_place_orders_and_browse() {
        let user = principal(1, Role::User);
        assert_eq!(authorize(Some(&user), Action::BrowseCatalog), Ok(()));
        assert_eq!(authorize(Some(&user), Action::PlaceOrder), Ok(()));
    }

    #[test]
    fn test_user_owner_scoped_actions() {
        let user = principal(1, Role::User);
        let own = UserId::new(1);
        let other = UserId::new(2);

        assert_eq!(authorize(Some(&user), Action::ReadOrders { owner: own }), Ok(()));
        assert_eq!(authorize(Some(&user), Action::DeleteOrder { owner: own }), Ok(()));
        assert_eq!(
            authorize(Some(&user), Action::ReadOrders { owner: other }),
            Err(Deny::Forbidden)
        );
        assert_eq!(
            authorize(Some(&user), Action::DeleteOrder { owner: other }),
            Err(Deny::Forbidden)
        );
    }

    #[test]
    fn test_user_denied_admin_actions() {
        let user = principal(1, Role::User);
        assert_eq!(
            authorize(Some(&user), Action::ManageCatalog),
            Err(Deny::Forbidden)
        );
        assert_eq!(
            authorize(Some(&user), Action::ChangeOrderStatus),
            Err(Deny::Forbidden)
        );
    }

    #[test]
    fn test_admin_allowed_everything() {
        let admin = principal(9, Role::Admin);
        let other = UserId::new(2);
        for action in [
            Action::BrowseCatalog,
            Action::ManageCatalog,
            Action::PlaceOrder,
            Action::ReadOrders { owner: other },
            Action::ChangeOrderStatus,
            Action::DeleteOrder { owner: other },
        ] {
            assert_eq!(authorize(Some(&admin), action), Ok(()));
        }
    }

    #[test]
    fn test_deny_converts_to_http_errors() {
        assert!(matches!(
            AppError::from(Deny::Unauthorized),
            AppError::Unauthorized
        ));
        assert!(matches!(AppError::from(Deny::Forbidden), AppError::Forbidden));
    }
}
