//! Canned story content used when the model cannot provide safe text.
//!
//! Every text here passes the default content filter.

/// Topic recorded when the requested topic was rejected.
pub const TOPIC: &str = "a kind little bunny";

/// Opening used when no model opening could be committed.
pub const OPENING: &str = "Once upon a time, there was a kind little bunny named Benny who \
    loved to help others. One sunny morning, Benny decided to visit his friend Lily the lamb \
    to see if she needed any help in her garden.";

/// Characters introduced by [`OPENING`].
pub const OPENING_CHARACTERS: [&str; 2] = ["Benny", "Lily"];

/// Setting of [`OPENING`].
pub const OPENING_SETTING: &str = "a sunny garden";

/// Segment appended when a continuation could not be generated.
pub const CONTINUATION: &str = "The friends took a deep breath and smiled at each other. \
    Together they decided to keep going, one careful step at a time, and to help each other \
    whenever the path got tricky.";

/// Ending appended when no model ending could be committed.
pub const ENDING: &str = "And so our adventure comes to a happy end. The friends had learned \
    something wonderful today - that by working together and being kind to each other, they \
    could solve any problem. They smiled as they headed home, excited to share their story \
    with their families. The End.";
