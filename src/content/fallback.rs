//! Embedded animal data
//!
//! Used when a source file cannot be fetched or parsed.

use crate::models::EntityRecord;

/// Declared animal ids, in display order
pub const ANIMAL_IDS: &[&str] = &[
    "корова", "собака", "кошка", "петух", "курица", "свинья", "овца", "коза",
    "лошадь", "утка", "гусь", "ворона", "воробей", "сова", "бобр", "голубь",
    "лиса", "волк", "медведь", "ёжик", "белка", "заяц", "лягушка", "лебедь",
    "мышка", "кузнечик", "пчела", "цыплёнок", "тюлень", "комар",
];

/// (id, icon, sound)
const FALLBACK_TABLE: &[(&str, &str, &str)] = &[
    ("корова", "🐄", "муууу"),
    ("собака", "🐕", "гав-гав"),
    ("кошка", "🐱", "мяу-мяу"),
    ("петух", "🐓", "ку-ка-ре-ку"),
    ("курица", "🐔", "ко-ко-ко"),
    ("свинья", "🐷", "хрю-хрю"),
    ("овца", "🐑", "бе-е-е"),
    ("коза", "🐐", "ме-е-е"),
    ("лошадь", "🐴", "и-го-го"),
    ("утка", "🦆", "кря-кря"),
    ("гусь", "🪿", "га-га-га"),
    ("ворона", "🐦‍⬛", "кар-кар"),
    ("воробей", "🐦", "чик-чирик"),
    ("сова", "🦉", "ух-ух"),
    ("бобр", "🦫", "хлоп-хлоп"),
    ("голубь", "🕊️", "гур-гур"),
    ("лиса", "🦊", "тяв-тяв"),
    ("волк", "🐺", "ау-у-у"),
    ("медведь", "🐻", "р-р-р"),
    ("ёжик", "🦔", "фр-фр"),
    ("белка", "🐿️", "цок-цок"),
    ("заяц", "🐰", "прыг-прыг"),
    ("лягушка", "🐸", "ква-ква"),
    ("лебедь", "🦢", "кур-лы"),
    ("мышка", "🐭", "пи-пи"),
    ("кузнечик", "🦗", "стр-стр"),
    ("пчела", "🐝", "ж-ж-ж"),
    ("цыплёнок", "🐤", "пи-пи-пи"),
    ("тюлень", "🦭", "ар-ар"),
    ("комар", "🦟", "з-з-з"),
];

/// Look up the embedded record for an id
pub fn fallback_record(id: &str) -> Option<EntityRecord> {
    FALLBACK_TABLE
        .iter()
        .find(|(fid, _, _)| *fid == id)
        .map(|(_, icon, sound)| EntityRecord {
            image_url: (*icon).to_string(),
            sound_text: (*sound).to_string(),
        })
}
