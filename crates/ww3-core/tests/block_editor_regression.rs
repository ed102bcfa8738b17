use ww3_core::domain::Ww3ErrorCategory;
use ww3_core::namelist::{BlockEdit, BlockPosition, add_block, block_marker, remove_block};

const SHEL_LIKE: &str = "&DOMAIN_NML
  DOMAIN%IOSTYP = 1
/

&INPUT_NML
  INPUT%FORCING%WINDS = 'T'
/

&OUTPUT_TYPE_NML
  TYPE%FIELD%LIST = 'HS'
/
";

const HOMOG_COUNT: &str = "&HOMOG_COUNT_NML
  HOMOG_COUNT%N_WND = 1
/";

fn occurrences(text: &str, needle: &str) -> usize {
    text.matches(needle).count()
}

#[test]
fn adding_the_same_block_twice_keeps_a_single_copy() {
    let once = add_block(SHEL_LIKE, HOMOG_COUNT, BlockPosition::End).expect("first add");
    let twice = add_block(&once, HOMOG_COUNT, BlockPosition::End).expect("second add");

    assert_eq!(occurrences(&twice, "&HOMOG_COUNT_NML"), 1);
    assert_eq!(occurrences(&twice, "HOMOG_COUNT%N_WND = 1"), 1);
    assert!(twice.starts_with("&DOMAIN_NML\n"));
}

#[test]
fn re_adding_an_existing_block_replaces_its_body() {
    let replacement = "&INPUT_NML
  INPUT%FORCING%WINDS = 'F'
  INPUT%FORCING%CURRENTS = 'T'
/";
    let edited = add_block(SHEL_LIKE, replacement, BlockPosition::End).expect("replace");

    assert_eq!(occurrences(&edited, "&INPUT_NML"), 1);
    assert!(edited.contains("INPUT%FORCING%CURRENTS = 'T'"));
    assert!(!edited.contains("INPUT%FORCING%WINDS = 'T'"));
    assert!(edited.contains("&OUTPUT_TYPE_NML"));
}

#[test]
fn added_block_can_be_removed_again() {
    let added = BlockEdit::add(HOMOG_COUNT, BlockPosition::End)
        .apply(SHEL_LIKE)
        .expect("add");
    let removed = BlockEdit::remove(block_marker(HOMOG_COUNT))
        .apply(&added)
        .expect("remove");

    assert!(!removed.contains("HOMOG_COUNT%N_WND"));
    assert!(removed.contains("! &HOMOG_COUNT_NML WAS REMOVED"));
    assert!(removed.contains("&OUTPUT_TYPE_NML\n  TYPE%FIELD%LIST = 'HS'\n/"));
}

#[test]
fn removing_keeps_surrounding_blocks_intact() {
    let removed = remove_block(SHEL_LIKE, "&INPUT_NML").expect("remove");

    assert!(!removed.contains("INPUT%FORCING%WINDS"));
    assert!(removed.starts_with("&DOMAIN_NML\n  DOMAIN%IOSTYP = 1\n/\n"));
    assert!(removed.ends_with("&OUTPUT_TYPE_NML\n  TYPE%FIELD%LIST = 'HS'\n/\n"));
}

#[test]
fn insertion_at_offset_lands_before_the_following_block() {
    let offset = SHEL_LIKE.find("&OUTPUT_TYPE_NML").expect("block present");
    let edited = add_block(SHEL_LIKE, HOMOG_COUNT, BlockPosition::At(offset)).expect("insert");

    let homog = edited.find("&HOMOG_COUNT_NML").expect("inserted");
    let output = edited.find("&OUTPUT_TYPE_NML").expect("kept");
    assert!(homog < output);
}

#[test]
fn malformed_edits_are_rejected() {
    let error = remove_block(SHEL_LIKE, "&MISSING_NML").expect_err("absent block");
    assert_eq!(error.category(), Ww3ErrorCategory::MalformedBlock);

    let error = add_block(SHEL_LIKE, "HOMOG_COUNT%N_WND = 1\n/", BlockPosition::End)
        .expect_err("no leading marker");
    assert_eq!(error.category(), Ww3ErrorCategory::MalformedBlock);

    let error = add_block(SHEL_LIKE, "&HOMOG_COUNT_NML\n  HOMOG_COUNT%N_WND = 1", BlockPosition::End)
        .expect_err("no closing slash");
    assert_eq!(error.category(), Ww3ErrorCategory::MalformedBlock);
}
