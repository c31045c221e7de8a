use pushkind_companies::domain::company::{NewCompany, NewDeal, UpdateCompany};
use pushkind_companies::domain::query::{CrudFilter, CrudOperator, SortOrder};
use pushkind_companies::domain::types::{AvatarUrl, CompanyId, CompanyName, DealValue};
use pushkind_companies::list::projector::total_revenue;
use pushkind_companies::list::state::{ListSettings, QueryState};
use pushkind_companies::repository::errors::RepositoryError;
use pushkind_companies::repository::{CompanyReader, CompanyWriter, DieselRepository};

mod common;

fn new_company(name: &str) -> NewCompany {
    NewCompany::new(CompanyName::new(name).unwrap(), None)
}

fn new_deal(company_id: CompanyId, title: &str, value: f64) -> NewDeal {
    NewDeal {
        company_id,
        title: title.to_string(),
        value: DealValue::new(value).unwrap(),
    }
}

fn sorted_by_name() -> QueryState {
    let mut state = QueryState::new(&ListSettings::default());
    state.on_sort_change("name", SortOrder::Asc);
    state
}

#[test]
fn test_company_repository_crud() {
    let test_db = common::TestDb::new("test_company_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let acme = repo
        .create_company(&NewCompany::new(
            CompanyName::new("Acme").unwrap(),
            Some(AvatarUrl::new("https://example.com/acme.png").unwrap()),
        ))
        .unwrap();
    assert_eq!(acme.name, "Acme");
    assert_eq!(
        acme.avatar_url.as_deref(),
        Some("https://example.com/acme.png")
    );
    assert!(acme.created_at.is_some());

    let fetched = repo.get_company_by_id(acme.id).unwrap().unwrap();
    assert_eq!(fetched.id, acme.id);
    assert_eq!(fetched.deals_aggregate, Some(vec![]));

    let updated = repo
        .update_company(
            acme.id,
            &UpdateCompany::new(CompanyName::new("Acme Corp").unwrap(), None),
        )
        .unwrap();
    assert_eq!(updated.name, "Acme Corp");
    assert!(updated.avatar_url.is_none());

    repo.delete_company(acme.id).unwrap();
    assert!(repo.get_company_by_id(acme.id).unwrap().is_none());

    let missing = CompanyId::new(9999).unwrap();
    assert!(matches!(
        repo.delete_company(missing),
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        repo.update_company(
            missing,
            &UpdateCompany::new(CompanyName::new("Ghost").unwrap(), None)
        ),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_list_sums_deal_values() {
    let test_db = common::TestDb::new("test_list_sums_deal_values.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let acme = repo.create_company(&new_company("Acme")).unwrap();
    let beta = repo.create_company(&new_company("Beta")).unwrap();
    let inserted = repo
        .create_deals(&[
            new_deal(acme.id, "Licences", 4000.0),
            new_deal(acme.id, "Support", 200.0),
        ])
        .unwrap();
    assert_eq!(inserted, 2);

    let (total, items) = repo
        .list_companies(&sorted_by_name().build_query_descriptor())
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].id, acme.id);
    assert_eq!(total_revenue(&items[0]), 4200.0);

    assert_eq!(items[1].id, beta.id);
    assert_eq!(items[1].deals_aggregate, Some(vec![]));
    assert_eq!(total_revenue(&items[1]), 0.0);
}

#[test]
fn test_list_search_and_sort() {
    let test_db = common::TestDb::new("test_list_search_and_sort.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    for name in ["Acme Widgets", "Beta", "acme", "Gamma"] {
        repo.create_company(&new_company(name)).unwrap();
    }

    let mut state = sorted_by_name();
    state.on_search("ACME");
    let (total, items) = repo
        .list_companies(&state.build_query_descriptor())
        .unwrap();
    assert_eq!(total, 2);
    let names: Vec<_> = items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Acme Widgets", "acme"]);

    let mut state = QueryState::new(&ListSettings::default());
    state.on_sort_change("name", SortOrder::Desc);
    let (_, items) = repo
        .list_companies(&state.build_query_descriptor())
        .unwrap();
    assert_eq!(items[0].name, "acme");

    let mut state = sorted_by_name();
    state.on_filter_change([CrudFilter::new(
        "name",
        CrudOperator::Startswith,
        Some("Be".to_string()),
    )]);
    let (total, items) = repo
        .list_companies(&state.build_query_descriptor())
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Beta");
}

#[test]
fn test_list_search_matches_wildcards_literally() {
    let test_db = common::TestDb::new("test_list_search_matches_wildcards_literally.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    repo.create_company(&new_company("50% Off")).unwrap();
    repo.create_company(&new_company("500 Club")).unwrap();
    repo.create_company(&new_company("A_B Labs")).unwrap();
    repo.create_company(&new_company("AXB Labs")).unwrap();

    let mut state = sorted_by_name();
    state.on_search("50%");
    let (total, items) = repo
        .list_companies(&state.build_query_descriptor())
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "50% Off");

    state.on_search("a_b");
    let (total, items) = repo
        .list_companies(&state.build_query_descriptor())
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "A_B Labs");
}

#[test]
fn test_list_paginates_with_stable_total() {
    let test_db = common::TestDb::new("test_list_paginates_with_stable_total.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    for i in 0..14 {
        repo.create_company(&new_company(&format!("Company {i:02}")))
            .unwrap();
    }

    let mut state = sorted_by_name();
    assert!(state.on_page_change(2));
    let (total, items) = repo
        .list_companies(&state.build_query_descriptor())
        .unwrap();
    assert_eq!(total, 14);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Company 12");
    assert_eq!(items[1].name, "Company 13");
}

#[test]
fn test_list_default_state_lists_everything() {
    let test_db = common::TestDb::new("test_list_default_state_lists_everything.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let first = repo.create_company(&new_company("First")).unwrap();
    let second = repo.create_company(&new_company("Second")).unwrap();

    let state = QueryState::new(&ListSettings::default());
    let (total, items) = repo
        .list_companies(&state.build_query_descriptor())
        .unwrap();
    assert_eq!(total, 2);
    let ids: Vec<_> = items.iter().map(|c| c.id).collect();
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
}

#[test]
fn test_list_rejects_unsupported_filter() {
    let test_db = common::TestDb::new("test_list_rejects_unsupported_filter.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let mut descriptor = QueryState::new(&ListSettings::default()).build_query_descriptor();
    descriptor.filters.push(CrudFilter::new(
        "avatarUrl",
        CrudOperator::Eq,
        Some("x".to_string()),
    ));

    assert!(matches!(
        repo.list_companies(&descriptor),
        Err(RepositoryError::ValidationError(_))
    ));
}

#[test]
fn test_delete_company_removes_deals() {
    let test_db = common::TestDb::new("test_delete_company_removes_deals.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let acme = repo.create_company(&new_company("Acme")).unwrap();
    repo.create_deals(&[new_deal(acme.id, "Licences", 10.0)])
        .unwrap();
    repo.delete_company(acme.id).unwrap();

    // A recreated company must not inherit the old deals.
    let again = repo.create_company(&new_company("Acme")).unwrap();
    let fetched = repo.get_company_by_id(again.id).unwrap().unwrap();
    assert_eq!(total_revenue(&fetched), 0.0);
}

#[test]
fn test_list_rejects_unaddressable_page() {
    let test_db = common::TestDb::new("test_list_rejects_unaddressable_page.db");
    let repo = DieselRepository::new(test_db.pool().clone());
    repo.create_company(&new_company("Acme")).unwrap();

    let mut descriptor = QueryState::new(&ListSettings::default()).build_query_descriptor();
    descriptor.pagination.current = usize::MAX;

    assert!(matches!(
        repo.list_companies(&descriptor),
        Err(RepositoryError::ValidationError(_))
    ));

    let state = QueryState::from_query_string(
        &ListSettings::default(),
        "current=9223372036854775807",
    );
    let (total, items) = repo
        .list_companies(&state.build_query_descriptor())
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items.len(), 1);
}
