//! Narration tones and the cursor used to cycle through them.

/// A named narration persona
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
    pub emoji: &'static str,
}

pub static TONES: [Tone; 8] = [
    Tone {
        id: "funny",
        name: "Comedic",
        description: "Witty & humorous",
        prompt: "hilarious, cheeky weather report with brilliant British-style comparisons like \
\"wind so strong it'll blow your eyebrows clean off\". Be playfully rude and use funny analogies \
about family, relationships and everyday situations. Think pub comedian meets weather presenter",
        emoji: "😄",
    },
    Tone {
        id: "professional",
        name: "Professional",
        description: "Formal & detailed",
        prompt: "extremely professional, informative and detailed weather reporter",
        emoji: "📊",
    },
    Tone {
        id: "poetic",
        name: "Poetic",
        description: "Artistic & lyrical",
        prompt: "poetic and artistic weather report using beautiful metaphors and lyrical language. \
Think of a poet describing nature",
        emoji: "🎭",
    },
    Tone {
        id: "dramatic",
        name: "Dramatic",
        description: "Epic & theatrical",
        prompt: "dramatic and theatrical weather report as if narrating an epic movie scene. \
Be cinematic and intense",
        emoji: "🎬",
    },
    Tone {
        id: "chill",
        name: "Chill",
        description: "Laid-back & casual",
        prompt: "super chill and laid-back weather report like a surfer or cool friend just hanging out. \
Use casual language",
        emoji: "😎",
    },
    Tone {
        id: "scientific",
        name: "Scientific",
        description: "Technical & analytical",
        prompt: "highly scientific and technical weather analysis with meteorological terminology \
and data-driven insights",
        emoji: "🔬",
    },
    Tone {
        id: "inpc",
        name: "INPC",
        description: "Cat-based weather reading",
        prompt: "short, observational, slightly amused weather report. Open simply (\"Right then, weather\"). \
George the cat gives the temperature with one tiny action such as a blink or an ear twitch, in plain \
terms like \"less than warm\". A Tree of Truth reports only the wind (\"low wind\", \"bit windy\", \
\"verging on moderate\"). Describe the sky simply (\"bit grey\", \"mottled\", \"blue-ish\") and end \
with \"There you go, that's the weather.\" Stay grounded, no rambling",
        emoji: "🐈‍⬛",
    },
    Tone {
        id: "cute",
        name: "Cute",
        description: "Sweet & whimsical",
        prompt: "adorable and sweet weather report with charming nature imagery like birds chirping, \
butterflies dancing and puddle jumping. Be whimsical and positive with cute metaphors",
        emoji: "🦋",
    },
];

pub fn tone_by_id(id: &str) -> Option<&'static Tone> {
    TONES.iter().find(|t| t.id == id)
}

/// Position in [`TONES`], wrapping in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToneCursor {
    index: usize,
}

impl ToneCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a saved position. Out-of-range indices fall back to the first tone.
    pub fn from_saved(index: usize) -> Self {
        if index < TONES.len() {
            Self { index }
        } else {
            Self::default()
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        TONES.iter().position(|t| t.id == id).map(|index| Self { index })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'static Tone {
        &TONES[self.index]
    }

    pub fn next(&mut self) -> &'static Tone {
        self.index = (self.index + 1) % TONES.len();
        self.current()
    }

    pub fn previous(&mut self) -> &'static Tone {
        self.index = self.index.checked_sub(1).unwrap_or(TONES.len() - 1);
        self.current()
    }
}
