use mesi_core::MesiState;
use rstest::rstest;

#[rstest]
#[case(MesiState::Modified, true, true, 'M')]
#[case(MesiState::Exclusive, true, true, 'E')]
#[case(MesiState::Shared, true, false, 'S')]
#[case(MesiState::Invalid, false, false, 'I')]
fn state_predicates(
    #[case] state: MesiState,
    #[case] valid: bool,
    #[case] owned: bool,
    #[case] letter: char,
) {
    assert_eq!(state.is_valid(), valid);
    assert_eq!(state.is_owned(), owned);
    assert_eq!(state.letter(), letter);
    assert_eq!(state.to_string(), letter.to_string());
}

#[test]
fn default_state_is_invalid() {
    assert_eq!(MesiState::default(), MesiState::Invalid);
}
