use super::common::*;
use chrono::Duration;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::error::RepositoryError;
use crate::mortgage::domain::{ApplicationId, OfferId};
use crate::mortgage::repository::{
    ApplicationRecord, ApplicationRepository, ApplicationStatus, OfferRepository,
};
use crate::mortgage::{
    MortgageOfferCalculator, MortgageService, MortgageServiceError, NoopObserver, OfferDecision,
    OfferError,
};

#[test]
fn submit_stores_application_as_submitted() {
    let (service, applications, _, _) = build_service();

    let record = service
        .submit(approvable_application())
        .expect("submission succeeds");

    assert_eq!(record.status, ApplicationStatus::Submitted);
    assert!(record.offer_id.is_none());
    let stored = applications
        .fetch(&record.application.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, record);
}

#[test]
fn submit_rejects_duplicates() {
    let (service, _, _, _) = build_service();
    service
        .submit(approvable_application())
        .expect("first submission succeeds");

    match service.submit(approvable_application()) {
        Err(MortgageServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn submit_validates_before_storing() {
    let (service, applications, _, _) = build_service();

    match service.submit(application("zero", 0, 100_000)) {
        Err(MortgageServiceError::Offer(OfferError::InvalidIncome(_))) => {}
        other => panic!("expected invalid income, got {other:?}"),
    }
    match service.submit(application("  ", 50_000, 100_000)) {
        Err(MortgageServiceError::MissingApplicationId) => {}
        other => panic!("expected missing id, got {other:?}"),
    }

    assert!(applications
        .fetch(&ApplicationId("zero".to_string()))
        .expect("fetch succeeds")
        .is_none());
}

#[test]
fn process_approves_and_persists_offer() {
    let (service, applications, offers, observer) = build_service();
    let record = service
        .submit(approvable_application())
        .expect("submission succeeds");

    let decision = service
        .process_at(&record.application.id, fixed_now())
        .expect("processing succeeds");

    let offer = match decision {
        OfferDecision::Approved { offer } => offer,
        other => panic!("expected approval, got {other:?}"),
    };
    assert_eq!(offer.monthly_payment, Decimal::new(202_674, 2));
    assert_eq!(offer.offer_date, fixed_now());
    assert_eq!(offer.expiration_date, fixed_now() + Duration::days(7));

    let stored = applications
        .fetch(&record.application.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ApplicationStatus::Approved);
    assert_eq!(stored.offer_id.as_ref(), Some(&offer.id));
    assert_eq!(
        offers.fetch(&offer.id).expect("fetch succeeds"),
        Some(offer.clone())
    );
    assert_eq!(observer.decisions().len(), 1);
    assert_eq!(observer.offers(), vec![offer]);
}

#[test]
fn process_rejects_low_income_without_offer() {
    let (service, applications, offers, observer) = build_service();
    let record = service
        .submit(low_income_application())
        .expect("submission succeeds");

    let decision = service
        .process(&record.application.id)
        .expect("processing succeeds");

    match decision {
        OfferDecision::Rejected { reason } => assert!(reason.contains("minimum")),
        other => panic!("expected rejection, got {other:?}"),
    }
    let stored = applications
        .fetch(&record.application.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ApplicationStatus::Rejected);
    assert_eq!(offers.len(), 0);
    assert!(observer.offers().is_empty());
}

#[test]
fn process_is_idempotent_for_decided_applications() {
    let (service, _, offers, observer) = build_service();
    let record = service
        .submit(approvable_application())
        .expect("submission succeeds");

    let first = service
        .process(&record.application.id)
        .expect("first processing");
    let second = service
        .process(&record.application.id)
        .expect("second processing");

    assert_eq!(first, second);
    assert_eq!(offers.len(), 1);
    assert_eq!(observer.decisions().len(), 1);
}

#[test]
fn concurrent_processing_issues_a_single_offer() {
    let applications = MemoryApplications::default();
    let offers = MemoryOffers::default();
    let application = approvable_application();
    applications
        .insert(ApplicationRecord::submitted(application.clone()))
        .expect("seed application");
    let service = Arc::new(MortgageService::new(
        Arc::new(RendezvousApplications::new(applications.clone(), 2)),
        Arc::new(offers.clone()),
        MortgageOfferCalculator::new(Arc::new(NoopObserver)),
    ));

    let workers: Vec<_> = (0..2)
        .map(|_| {
            let service = Arc::clone(&service);
            let id = application.id.clone();
            std::thread::spawn(move || service.process(&id))
        })
        .collect();
    let offer_ids: Vec<OfferId> = workers
        .into_iter()
        .map(|worker| match worker.join().expect("worker finishes") {
            Ok(OfferDecision::Approved { offer }) => offer.id,
            other => panic!("expected approval, got {other:?}"),
        })
        .collect();

    assert_eq!(offer_ids[0], offer_ids[1]);
    assert_eq!(offers.len(), 1);
    let stored = applications
        .fetch(&application.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ApplicationStatus::Approved);
    assert_eq!(stored.offer_id, Some(offer_ids[0].clone()));
}

#[test]
fn process_propagates_not_found() {
    let (service, _, _, _) = build_service();

    match service.process(&ApplicationId("missing".to_string())) {
        Err(MortgageServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn process_leaves_application_submitted_when_offer_store_fails() {
    let applications = MemoryApplications::default();
    let service = MortgageService::new(
        Arc::new(applications.clone()),
        Arc::new(UnavailableOffers),
        MortgageOfferCalculator::default(),
    );
    let record = service
        .submit(approvable_application())
        .expect("submission succeeds");

    match service.process(&record.application.id) {
        Err(MortgageServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable, got {other:?}"),
    }
    let stored = applications
        .fetch(&record.application.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ApplicationStatus::Submitted);
}

#[test]
fn quote_prices_without_persisting() {
    let (service, applications, offers, _) = build_service();
    let app = application("quote-only", 20_000, 150_000);

    let quote = service.quote(&app).expect("quote succeeds");

    assert!(!quote.decision.approved);
    assert_eq!(quote.offer.approved_amount, Decimal::from(100_000));
    assert!(applications
        .fetch(&app.id)
        .expect("fetch succeeds")
        .is_none());
    assert_eq!(offers.len(), 0);
}

#[test]
fn offer_lookup_propagates_not_found() {
    let (service, _, _, _) = build_service();

    match service.offer(&OfferId("nope".to_string())) {
        Err(MortgageServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}
