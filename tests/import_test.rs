// ==========================================
// 条目文件导入集成测试
// ==========================================


use library_lending::importer::{EntryImporter, ImportError};
use library_lending::{QueryApi, WorkCategory, WorkType};
use std::io::Write;
use tempfile::NamedTempFile;
use test_helpers::*;

const ENTRIES: &str = "\
USER:Maria Albertina:ma@x.pt
USER:João Pestana:jp@x.pt
BOOK:A Ilustre Casa de Ramires:Eça de Queirós:18:FICTION:972-001:4
BOOK:Cálculo Numérico:Ana Ribeiro, Rui Costa:40:SCITECH:972-002:1
DVD:Vale Abraão:Manoel de Oliveira:9:FICTION:IGAC-93:2
BOOK:Gramática:Academia:20:REFERENCE:972-003:3
";

fn write_entries(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_import_file_registers_everything() {
    let file = write_entries(ENTRIES);
    let mut service = new_service();

    let summary = EntryImporter::import_file(&mut service, file.path()).unwrap();
    assert_eq!(summary.users, 2);
    assert_eq!(summary.works, 4);

    let api = QueryApi::new(service.library());
    let names: Vec<&str> = api.users().iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["João Pestana", "Maria Albertina"]);

    let calculo = api.work(2).unwrap();
    assert_eq!(calculo.category, WorkCategory::Scitech);
    assert_eq!(calculo.format.creator_names(), vec!["Ana Ribeiro", "Rui Costa"]);
    assert_eq!(api.work(3).unwrap().work_type(), WorkType::Dvd);
    assert_eq!(api.works_by_creator("Rui Costa").unwrap().len(), 1);
    assert_eq!(service.library().creators().count(), 5);
}

#[test]
fn test_imported_entries_are_usable() {
    let mut service = new_service();
    EntryImporter::import_str(&mut service, ENTRIES).unwrap();

    // 参考类作品不可借; 超价作品对 Normal 读者不可借
    assert_eq!(service.request_work(1, 4).unwrap_err().rule_id(), Some(5));
    assert_eq!(service.request_work(1, 2).unwrap_err().rule_id(), Some(6));
    assert_eq!(service.request_work(1, 1).unwrap(), 9);
}

#[test]
fn test_malformed_entry_reports_offending_line() {
    let file = write_entries("USER:Maria:m@x.pt\nBOOK:Sem Campos:Autor:10\n");
    let mut service = new_service();

    let err = EntryImporter::import_file(&mut service, file.path()).unwrap_err();
    match err {
        ImportError::UnrecognizedEntry { row, line, .. } => {
            assert_eq!(row, 2);
            assert_eq!(line, "BOOK:Sem Campos:Autor:10");
        }
        other => panic!("应为无法识别的条目: {:?}", other),
    }
    assert_eq!(service.library().users().count(), 0);
}

#[test]
fn test_blank_creator_name_is_rejected() {
    let mut service = new_service();
    let err = EntryImporter::import_str(&mut service, "BOOK:Órfão: :10:FICTION:972-9:1\n").unwrap_err();
    assert!(matches!(err, ImportError::UnrecognizedEntry { row: 1, .. }));
    assert_eq!(service.library().works().count(), 0);
}

#[test]
fn test_missing_file() {
    let mut service = new_service();
    assert!(matches!(
        EntryImporter::import_file(&mut service, "/nonexistent/entries.txt"),
        Err(ImportError::FileNotFound(_))
    ));
}
