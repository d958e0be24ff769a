//! Course, subject and open-request lookups shared by the intake handlers.
//!
//! Subject listings are always ordered by subject id; the position in that
//! order is the number users type to pick a subject.

use crate::domain::conversation::Reply;
use crate::domain::exemption::{fields, Collection, Course, RequestStatus, Subject};
use crate::domain::foundation::{CourseCode, RegistrationId, Timestamp};
use crate::ports::{Document, DocumentStore, Filter, Query, SortDirection, StoreError};

use super::settings::ReplySettings;

const COURSE_LISTING_HEADER: &str = "Type your course code:\n";

const SUBJECT_LISTING_HEADER: &str = "Type the number of one or more subjects to exempt:\n";

/// Every non-sentinel course, ascending by code.
pub(crate) async fn list_courses(store: &dyn DocumentStore) -> Result<Vec<Course>, StoreError> {
    let query = Query::new()
        .filter(Filter::ne(fields::COURSE_ID, Collection::Courses.sentinel_key()))
        .order_by(fields::COURSE_ID, SortDirection::Ascending)
        .select(&[fields::COURSE_ID, fields::NAME]);

    store
        .query(Collection::Courses, &query)
        .await?
        .iter()
        .map(Document::decode)
        .collect()
}

pub(crate) async fn course_exists(
    store: &dyn DocumentStore,
    code: &CourseCode,
) -> Result<bool, StoreError> {
    let filters = [
        Filter::ne(fields::COURSE_ID, Collection::Courses.sentinel_key()),
        Filter::eq(fields::COURSE_ID, code.as_str()),
    ];
    Ok(store.count(Collection::Courses, &filters).await? > 0)
}

/// Subjects of a course in listing order.
pub(crate) async fn ordered_subjects(
    store: &dyn DocumentStore,
    course: &CourseCode,
) -> Result<Vec<Subject>, StoreError> {
    let query = Query::new()
        .filter(Filter::ne(fields::SUBJECT_ID, Collection::Subjects.sentinel_key()))
        .filter(Filter::eq(fields::COURSE_ID, course.as_str()))
        .order_by(fields::SUBJECT_ID, SortDirection::Ascending);

    store
        .query(Collection::Subjects, &query)
        .await?
        .iter()
        .map(Document::decode)
        .collect()
}

/// Creation time of the oldest OPEN request of the registration id.
pub(crate) async fn open_request_since(
    store: &dyn DocumentStore,
    registration: &RegistrationId,
) -> Result<Option<Timestamp>, StoreError> {
    let lookup = Query::new()
        .filter(Filter::ne(
            fields::REGISTRATION,
            Collection::Requests.sentinel_key(),
        ))
        .filter(Filter::eq(fields::REGISTRATION, registration.as_str()))
        .filter(Filter::eq(fields::STATUS, RequestStatus::Open.stored_value()))
        .order_by(fields::CREATED_AT, SortDirection::Ascending)
        .select(&[fields::CREATED_AT])
        .limit(1);

    let requests = store.query(Collection::Requests, &lookup).await?;
    let Some(request) = requests.first() else {
        return Ok(None);
    };

    let created_at = request.get_str(fields::CREATED_AT).ok_or_else(|| {
        StoreError::Serialization(format!("request {} has no creation time", request.id))
    })?;
    Timestamp::parse(created_at)
        .map(Some)
        .map_err(|e| StoreError::Serialization(format!("request {}: {}", request.id, e)))
}

pub(crate) fn open_request_notice(registration: &RegistrationId, opened_at: &Timestamp) -> Reply {
    Reply::text(format!(
        "Registration {} already has an OPEN request made on {}.",
        registration,
        opened_at.to_display_string()
    ))
}

pub(crate) fn course_listing(settings: &ReplySettings, courses: &[Course]) -> Reply {
    if courses.is_empty() {
        return Reply::text(format!(
            "No course registered. Contact {}.",
            settings.support_contact
        ));
    }

    let mut acc = settings.accumulator(COURSE_LISTING_HEADER);
    for course in courses {
        acc.push(&format!("\n{}", course.listing_line()));
    }
    acc.finish()
}

pub(crate) fn subject_listing(
    settings: &ReplySettings,
    course: &CourseCode,
    subjects: &[Subject],
) -> Reply {
    if subjects.is_empty() {
        return Reply::text(format!(
            "No subject registered for course {}. Contact {}.",
            course, settings.support_contact
        ));
    }

    let mut acc = settings.accumulator(SUBJECT_LISTING_HEADER);
    for (index, subject) in subjects.iter().enumerate() {
        acc.push(&format!("\n{} - {}", index, subject.name));
    }
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::exemption::fixtures;

    #[tokio::test]
    async fn courses_skip_the_sentinel_row() {
        let store = fixtures::catalog_store(&[("BCC", 3)]).await;
        fixtures::insert_sentinels(&store).await;

        let courses = list_courses(&store).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].code, "BCC");
    }

    #[tokio::test]
    async fn subjects_come_back_in_id_order_for_one_course() {
        let store = fixtures::catalog_store(&[("BCC", 3), ("EST", 2)]).await;
        let code = CourseCode::new("bcc").unwrap();

        let subjects = ordered_subjects(&store, &code).await.unwrap();
        let ids: Vec<_> = subjects.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["BCC000", "BCC001", "BCC002"]);
    }

    #[tokio::test]
    async fn course_exists_checks_the_code() {
        let store = fixtures::catalog_store(&[("BCC", 1)]).await;
        assert!(course_exists(&store, &CourseCode::new("BCC").unwrap()).await.unwrap());
        assert!(!course_exists(&store, &CourseCode::new("XYZ").unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn only_open_requests_count_as_open() {
        let store = fixtures::catalog_store(&[("BCC", 1)]).await;
        fixtures::insert_sentinels(&store).await;
        let registration = RegistrationId::new("A1").unwrap();
        assert_eq!(open_request_since(&store, &registration).await.unwrap(), None);

        fixtures::insert_request(&store, "A1", "2023-01-02T10:00:00.000000Z", "INDEFERIDA").await;
        fixtures::insert_request(&store, "A1", "2023-03-05T14:07:09.000000Z", "ABERTA").await;
        fixtures::insert_request(&store, "B2", "2022-01-01T00:00:00.000000Z", "ABERTA").await;

        let opened_at = open_request_since(&store, &registration).await.unwrap().unwrap();
        assert_eq!(
            open_request_notice(&registration, &opened_at).joined(),
            "Registration A1 already has an OPEN request made on 05/03/2023 14:07:09."
        );
    }

    #[test]
    fn listing_headers_end_with_a_blank_line() {
        let settings = ReplySettings::new(1000, "the help desk");
        let courses = vec![Course::new("BCC", "Computer Science")];
        assert_eq!(
            course_listing(&settings, &courses).joined(),
            "Type your course code:\n\nBCC - Computer Science"
        );

        let subjects = fixtures::subjects("BCC", 1);
        assert_eq!(
            subject_listing(&settings, &CourseCode::new("BCC").unwrap(), &subjects).joined(),
            "Type the number of one or more subjects to exempt:\n\n0 - Subject number 0 of BCC"
        );
    }

    #[test]
    fn empty_listings_point_to_support() {
        let settings = ReplySettings::new(1000, "the help desk");
        let reply = course_listing(&settings, &[]);
        assert_eq!(reply.joined(), "No course registered. Contact the help desk.");

        let reply = subject_listing(&settings, &CourseCode::new("BCC").unwrap(), &[]);
        assert_eq!(
            reply.joined(),
            "No subject registered for course BCC. Contact the help desk."
        );
    }

    #[test]
    fn long_subject_listing_splits_between_lines() {
        let settings = ReplySettings::new(120, "support");
        let subjects = fixtures::subjects("BCC", 20);
        let reply = subject_listing(&settings, &CourseCode::new("BCC").unwrap(), &subjects);

        assert!(reply.segments().len() > 1);
        for segment in reply.segments() {
            assert!(segment.chars().count() <= 120);
        }
        assert!(reply.segments()[1].starts_with(char::is_numeric));
    }
}
