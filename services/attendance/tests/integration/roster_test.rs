use std::collections::HashMap;

use uuid::Uuid;

use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::roster::{
    AddClassInput, AddClassUseCase, AddStudentInput, AddStudentUseCase, AddTeacherInput,
    AddTeacherUseCase, BootstrapAdminInput, BootstrapAdminUseCase, ListClassesUseCase,
    ListStudentsUseCase,
};

use crate::helpers::{
    MockAdminRepo, MockClassRepo, MockStudentRepo, MockTeacherRepo, test_admin, test_class,
    test_student, test_teacher,
};

#[tokio::test]
async fn should_add_teacher_with_hashed_password() {
    let repo = MockTeacherRepo::empty();
    let handle = repo.handle();

    let uc = AddTeacherUseCase { teachers: repo };
    let teacher = uc
        .execute(AddTeacherInput {
            name: "Ms Hall".to_owned(),
            username: "hall".to_owned(),
            password: "chalk".to_owned(),
        })
        .await
        .unwrap();

    let stored = handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, teacher.id);
    assert!(
        stored[0].password_hash.starts_with("$argon2"),
        "credential must be stored as a PHC hash"
    );
    assert_ne!(stored[0].password_hash, "chalk");
}

#[tokio::test]
async fn should_reject_teacher_with_blank_name() {
    let uc = AddTeacherUseCase {
        teachers: MockTeacherRepo::empty(),
    };
    let result = uc
        .execute(AddTeacherInput {
            name: "   ".to_owned(),
            username: "hall".to_owned(),
            password: "chalk".to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AttendanceServiceError::Validation(_))));
}

#[tokio::test]
async fn should_surface_duplicate_teacher_username() {
    let existing = test_teacher("hall", "pw");
    let uc = AddTeacherUseCase {
        teachers: MockTeacherRepo::new(vec![existing]),
    };
    let result = uc
        .execute(AddTeacherInput {
            name: "Other Hall".to_owned(),
            username: "hall".to_owned(),
            password: "pw2".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(AttendanceServiceError::UsernameTaken)),
        "expected UsernameTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_add_class_owned_by_existing_teacher() {
    let teacher = test_teacher("hall", "pw");
    let classes = MockClassRepo::empty();
    let handle = classes.handle();

    let uc = AddClassUseCase {
        classes,
        teachers: MockTeacherRepo::new(vec![teacher.clone()]),
    };
    let class = uc
        .execute(AddClassInput {
            name: "Algebra".to_owned(),
            teacher_id: Some(teacher.id),
        })
        .await
        .unwrap();

    assert_eq!(class.teacher_id, Some(teacher.id));
    assert_eq!(handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_class_with_unknown_teacher() {
    let uc = AddClassUseCase {
        classes: MockClassRepo::empty(),
        teachers: MockTeacherRepo::empty(),
    };
    let result = uc
        .execute(AddClassInput {
            name: "Algebra".to_owned(),
            teacher_id: Some(Uuid::now_v7()),
        })
        .await;
    assert!(matches!(result, Err(AttendanceServiceError::RecordNotFound)));
}

#[tokio::test]
async fn should_allow_unstaffed_class() {
    let uc = AddClassUseCase {
        classes: MockClassRepo::empty(),
        teachers: MockTeacherRepo::empty(),
    };
    let class = uc
        .execute(AddClassInput {
            name: "Algebra".to_owned(),
            teacher_id: None,
        })
        .await
        .unwrap();
    assert!(class.teacher_id.is_none());
}

#[tokio::test]
async fn should_add_student_enrolled_in_existing_class() {
    let class = test_class("Algebra", None);
    let students = MockStudentRepo::empty();
    let handle = students.handle();

    let uc = AddStudentUseCase {
        students,
        classes: MockClassRepo::new(vec![class.clone()]),
    };
    let student = uc
        .execute(AddStudentInput {
            name: "Amy".to_owned(),
            username: "amy".to_owned(),
            password: "pencil".to_owned(),
            class_id: Some(class.id),
        })
        .await
        .unwrap();

    assert_eq!(student.class_id, Some(class.id));
    let stored = handle.lock().unwrap();
    assert!(stored[0].password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn should_reject_student_with_unknown_class() {
    let uc = AddStudentUseCase {
        students: MockStudentRepo::empty(),
        classes: MockClassRepo::empty(),
    };
    let result = uc
        .execute(AddStudentInput {
            name: "Amy".to_owned(),
            username: "amy".to_owned(),
            password: "pencil".to_owned(),
            class_id: Some(Uuid::now_v7()),
        })
        .await;
    assert!(matches!(result, Err(AttendanceServiceError::RecordNotFound)));
}

#[tokio::test]
async fn should_list_students_with_class_names_and_null_for_unassigned() {
    let class = test_class("Algebra", None);
    let enrolled = test_student("amy", "pw", Some(class.id));
    let unassigned = test_student("ben", "pw", None);

    let uc = ListStudentsUseCase {
        students: MockStudentRepo::new(vec![enrolled.clone(), unassigned.clone()])
            .with_class_names(HashMap::from([(class.id, class.name.clone())])),
    };

    let rows = uc.execute().await.unwrap();
    assert_eq!(rows.len(), 2);
    let amy = rows.iter().find(|(s, _)| s.id == enrolled.id).unwrap();
    assert_eq!(amy.1.as_deref(), Some("Algebra"));
    let ben = rows.iter().find(|(s, _)| s.id == unassigned.id).unwrap();
    assert!(ben.1.is_none());
}

#[tokio::test]
async fn should_list_classes_with_owning_teacher_names() {
    let teacher = test_teacher("hall", "pw");
    let staffed = test_class("Algebra", Some(teacher.id));
    let unstaffed = test_class("Biology", None);

    let uc = ListClassesUseCase {
        classes: MockClassRepo::new(vec![staffed.clone(), unstaffed.clone()])
            .with_teacher_names(HashMap::from([(teacher.id, teacher.name.clone())])),
    };

    let rows = uc.execute().await.unwrap();
    let algebra = rows.iter().find(|(c, _)| c.id == staffed.id).unwrap();
    assert_eq!(algebra.1.as_deref(), Some(teacher.name.as_str()));
    let biology = rows.iter().find(|(c, _)| c.id == unstaffed.id).unwrap();
    assert!(biology.1.is_none());
}

#[tokio::test]
async fn bootstrap_creates_admin_when_none_exists() {
    let repo = MockAdminRepo::empty();
    let handle = repo.handle();

    let uc = BootstrapAdminUseCase { admins: repo };
    let created = uc
        .execute(BootstrapAdminInput {
            username: "root".to_owned(),
            password: "secret".to_owned(),
        })
        .await
        .unwrap();

    assert!(created);
    let stored = handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn bootstrap_is_a_noop_when_an_admin_exists() {
    let repo = MockAdminRepo::new(vec![test_admin("root", "old-secret")]);
    let handle = repo.handle();

    let uc = BootstrapAdminUseCase { admins: repo };
    let created = uc
        .execute(BootstrapAdminInput {
            username: "root".to_owned(),
            password: "new-secret".to_owned(),
        })
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(handle.lock().unwrap().len(), 1);
}
