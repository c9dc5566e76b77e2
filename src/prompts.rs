/// Instruction sent alongside the photo to the vision model.
pub const PLACE_GUESS: &str = include_str!("../data/prompts/place_guess.txt");
