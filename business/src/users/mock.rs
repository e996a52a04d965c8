//! Synthetic users for the demo page.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::{Nationality, Role, User};
use crate::grid::RowId;

const FIRST_NAMES: &[&str] = &[
    "john", "mia", "alex", "linh", "minh", "jisoo", "hana", "david", "emma", "noah", "olivia",
    "liam", "sophia", "duc", "thao", "minjun", "seoyeon", "james", "grace", "henry",
];

const LAST_NAMES: &[&str] = &[
    "smith", "nguyen", "tran", "kim", "lee", "park", "johnson", "brown", "pham", "choi", "garcia",
    "miller", "le", "jung", "davis", "wilson",
];

const DOMAINS: &[&str] = &["example.com", "mail.test", "corp.dev"];

/// High half of every generated id; the low half is the user's position.
const ID_PREFIX: u64 = 0x6461_7461_6772_6964;

/// First day a generated user can have joined.
pub fn earliest_join_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 1).unwrap_or_default()
}

/// `count` users with join dates between [`earliest_join_date`] and `today`.
///
/// Ids depend only on position, so reloads reuse the interned [`RowId`]s of
/// earlier loads.
pub fn generate_users(count: usize, seed: Option<u64>, today: NaiveDate) -> Vec<User> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let start = earliest_join_date();
    let span = (today - start).num_days().max(0);
    (0..count)
        .map(|index| generate_user(&mut rng, index, start, span))
        .collect()
}

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

pub(crate) fn generated_id(index: usize) -> uuid::Uuid {
    uuid::Uuid::from_u64_pair(ID_PREFIX, index as u64)
}

fn generate_user(rng: &mut StdRng, index: usize, start: NaiveDate, span_days: i64) -> User {
    let id = generated_id(index);
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let separator = pick(rng, &[".", "_", ""]);
    let username = format!("{first}{separator}{last}{}", rng.gen_range(1..100));
    let email = format!("{first}.{last}{}@{}", rng.gen_range(1..1000), pick(rng, DOMAINS));

    let offset = u64::try_from(rng.gen_range(0..=span_days)).unwrap_or_default();
    let day = start.checked_add_days(Days::new(offset)).unwrap_or(start);
    let join_date = DateTime::from_naive_utc_and_offset(day.and_time(Default::default()), Utc);

    User {
        id: RowId::from(id.to_string().as_str()),
        avatar: format!("https://avatars.example.com/{id}.png"),
        username,
        email,
        role: *Role::ALL.choose(rng).unwrap_or(&Role::Staff),
        active: rng.gen_bool(0.5),
        join_date,
        salary: rng.gen_range(100..=500),
        national: *Nationality::ALL
            .choose(rng)
            .unwrap_or(&Nationality::Vietnamese),
    }
}
