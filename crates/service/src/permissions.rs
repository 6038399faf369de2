//! Role- and ownership-based capability checks.
//!
//! Every mutating operation consults one of these predicates before touching
//! the store. The checks are pure: the caller passes the authenticated actor
//! and whatever target attributes the decision needs, and gets back either
//! `Ok(())` or a `Forbidden` carrying the denial reason. Endpoint-level
//! "may you call this at all" checks and object-level "may you touch this
//! row" checks are kept separate so list endpoints stay cheap.

use uuid::Uuid;

use models::user::UserRole;

use crate::errors::ServiceError;

/// The authenticated caller, reconstructed from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
    pub is_staff: bool,
}

impl Actor {
    pub fn is_business(&self) -> bool { self.role == UserRole::Business }
    pub fn is_customer(&self) -> bool { self.role == UserRole::Customer }
}

fn deny(reason: &str) -> ServiceError {
    ServiceError::Forbidden(reason.to_string())
}

/// Offer creation is reserved for business accounts; reads are open to any
/// authenticated actor and never reach this check.
pub fn can_create_offer(actor: &Actor) -> Result<(), ServiceError> {
    if actor.is_business() {
        Ok(())
    } else {
        Err(deny("only business accounts can create offers"))
    }
}

/// Update and delete of a specific offer belong to its owner alone.
pub fn can_modify_offer(actor: &Actor, owner_id: Uuid) -> Result<(), ServiceError> {
    if actor.id == owner_id {
        Ok(())
    } else {
        Err(deny("only the offer owner can modify this offer"))
    }
}

/// Orders are placed by customers, and never against the actor's own offer.
pub fn can_create_order(actor: &Actor, offer_owner_id: Uuid) -> Result<(), ServiceError> {
    if !actor.is_customer() {
        return Err(deny("only customer accounts can place orders"));
    }
    if actor.id == offer_owner_id {
        return Err(deny("you cannot order your own offer"));
    }
    Ok(())
}

/// Status is advanced by business accounts or staff; which fields may change
/// is enforced separately by the strict-payload check.
pub fn can_update_order_status(actor: &Actor) -> Result<(), ServiceError> {
    if actor.is_business() || actor.is_staff {
        Ok(())
    } else {
        Err(deny("only business accounts can update an order"))
    }
}

pub fn can_delete_order(actor: &Actor) -> Result<(), ServiceError> {
    if actor.is_staff {
        Ok(())
    } else {
        Err(deny("only staff can delete orders"))
    }
}

pub fn can_create_review(actor: &Actor) -> Result<(), ServiceError> {
    if actor.is_customer() {
        Ok(())
    } else {
        Err(deny("only customers are allowed to write reviews"))
    }
}

/// Update and delete of a review belong to its author.
pub fn can_modify_review(actor: &Actor, reviewer_id: Uuid) -> Result<(), ServiceError> {
    if actor.id == reviewer_id {
        Ok(())
    } else {
        Err(deny("only the reviewer can modify this review"))
    }
}

pub fn can_modify_profile(actor: &Actor, owner_id: Uuid) -> Result<(), ServiceError> {
    if actor.id == owner_id {
        Ok(())
    } else {
        Err(deny("only the profile owner can modify this profile"))
    }
}

/// Order counts are private to the business account they describe.
pub fn can_view_business_counts(actor: &Actor, business_id: Uuid) -> Result<(), ServiceError> {
    if actor.id == business_id {
        Ok(())
    } else {
        Err(deny("order counts are only visible to the business account itself"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business() -> Actor {
        Actor { id: Uuid::new_v4(), role: UserRole::Business, is_staff: false }
    }

    fn customer() -> Actor {
        Actor { id: Uuid::new_v4(), role: UserRole::Customer, is_staff: false }
    }

    fn staff_customer() -> Actor {
        Actor { is_staff: true, ..customer() }
    }

    #[test]
    fn only_business_creates_offers() {
        assert!(can_create_offer(&business()).is_ok());
        assert!(can_create_offer(&customer()).is_err());
    }

    #[test]
    fn offer_mutation_is_owner_only() {
        let owner = business();
        assert!(can_modify_offer(&owner, owner.id).is_ok());
        assert!(can_modify_offer(&business(), owner.id).is_err());
    }

    #[test]
    fn customers_order_other_peoples_offers() {
        let buyer = customer();
        let owner_id = Uuid::new_v4();
        assert!(can_create_order(&buyer, owner_id).is_ok());
    }

    #[test]
    fn ordering_own_offer_is_denied() {
        let buyer = customer();
        let err = can_create_order(&buyer, buyer.id).unwrap_err();
        match err {
            ServiceError::Forbidden(reason) => assert!(reason.contains("own offer")),
            other => panic!("expected forbidden, got {:?}", other),
        }
    }

    #[test]
    fn businesses_cannot_place_orders() {
        assert!(can_create_order(&business(), Uuid::new_v4()).is_err());
    }

    #[test]
    fn status_updates_need_business_or_staff() {
        assert!(can_update_order_status(&business()).is_ok());
        assert!(can_update_order_status(&staff_customer()).is_ok());
        assert!(can_update_order_status(&customer()).is_err());
    }

    #[test]
    fn order_deletion_is_staff_only() {
        assert!(can_delete_order(&staff_customer()).is_ok());
        assert!(can_delete_order(&business()).is_err());
        assert!(can_delete_order(&customer()).is_err());
    }

    #[test]
    fn review_creation_is_customer_only() {
        assert!(can_create_review(&customer()).is_ok());
        assert!(can_create_review(&business()).is_err());
    }

    #[test]
    fn review_mutation_is_author_only() {
        let author = customer();
        assert!(can_modify_review(&author, author.id).is_ok());
        assert!(can_modify_review(&customer(), author.id).is_err());
    }

    #[test]
    fn profile_mutation_is_owner_only() {
        let owner = customer();
        assert!(can_modify_profile(&owner, owner.id).is_ok());
        assert!(can_modify_profile(&customer(), owner.id).is_err());
    }

    #[test]
    fn counts_are_owner_only() {
        let biz = business();
        assert!(can_view_business_counts(&biz, biz.id).is_ok());
        assert!(can_view_business_counts(&business(), biz.id).is_err());
        assert!(can_view_business_counts(&customer(), biz.id).is_err());
    }
}
