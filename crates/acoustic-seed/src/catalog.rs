//! Fixed sample rows shared by every generated project.

use acoustic_db::records::{AcousticMaterial, EquipmentItem, EquipmentSpace};

pub const PROJECT_TEMPLATES: [(&str, &str); 5] = [
    ("Acoustic Design - Corporate Office", "TechCorp Inc."),
    ("Concert Hall Renovation", "City Arts Foundation"),
    ("Recording Studio Design", "SoundWave Studios"),
    ("Educational Facility Acoustics", "Education District"),
    ("Healthcare Facility Noise Control", "HealthCare Plus"),
];

pub const PROJECT_STATUSES: [&str; 4] = ["In Progress", "Planning", "Review", "Completed"];

pub const MILESTONE_TYPES: [&str; 5] = [
    "Project Percent Completion",
    "Project Invoice",
    "Team Meeting",
    "Field Test",
    "Report Submission",
];

pub const MILESTONE_STATUSES: [&str; 3] = ["Completed", "In Progress", "Delayed"];

struct MaterialSpec {
    name: &'static str,
    kind: &'static str,
    nrc: Option<f64>,
    bands: [Option<f64>; 6],
    stc: Option<i64>,
    iic: Option<i64>,
    cost: f64,
}

const NO_BANDS: [Option<f64>; 6] = [None; 6];

const MATERIALS: [MaterialSpec; 6] = [
    MaterialSpec {
        name: "Acoustic Panel A",
        kind: "Room Treatment",
        nrc: Some(0.85),
        bands: [Some(0.75), Some(0.80), Some(0.85), Some(0.90), Some(0.85), Some(0.80)],
        stc: None,
        iic: None,
        cost: 12.50,
    },
    MaterialSpec {
        name: "Bass Trap B",
        kind: "Room Treatment",
        nrc: Some(0.95),
        bands: [Some(0.95), Some(0.90), Some(0.85), Some(0.80), Some(0.75), Some(0.70)],
        stc: None,
        iic: None,
        cost: 15.75,
    },
    MaterialSpec {
        name: "Ceiling Tile C",
        kind: "Room Treatment",
        nrc: Some(0.75),
        bands: [Some(0.65), Some(0.70), Some(0.75), Some(0.80), Some(0.75), Some(0.70)],
        stc: None,
        iic: None,
        cost: 8.25,
    },
    MaterialSpec {
        name: "Floor Underlayment X",
        kind: "Underlayment",
        nrc: None,
        bands: NO_BANDS,
        stc: Some(55),
        iic: Some(65),
        cost: 3.95,
    },
    MaterialSpec {
        name: "Isolation Mat Y",
        kind: "Underlayment",
        nrc: None,
        bands: NO_BANDS,
        stc: Some(52),
        iic: Some(62),
        cost: 2.75,
    },
    MaterialSpec {
        name: "Sound Barrier Z",
        kind: "Underlayment",
        nrc: None,
        bands: NO_BANDS,
        stc: Some(58),
        iic: Some(68),
        cost: 5.25,
    },
];

const EQUIPMENT: [(&str, &str, [f64; 7]); 3] = [
    ("HVAC Unit A", "Mechanical", [75.0, 78.0, 80.0, 82.0, 80.0, 78.0, 75.0]),
    ("Generator B", "Electrical", [85.0, 88.0, 90.0, 92.0, 90.0, 88.0, 85.0]),
    ("Pump C", "Mechanical", [70.0, 73.0, 75.0, 77.0, 75.0, 73.0, 70.0]),
];

/// name, type, L, W, H, NC, RT60 (500/1000/2000 Hz), background dBA, notes
type SpaceSpec = (
    &'static str,
    &'static str,
    f64,
    f64,
    f64,
    i64,
    [f64; 3],
    f64,
    &'static str,
);

const SPACES: [SpaceSpec; 5] = [
    (
        "Main Conference Room",
        "Meeting Space",
        30.0,
        20.0,
        10.0,
        30,
        [0.6, 0.5, 0.4],
        35.0,
        "Primary meeting space with video conferencing",
    ),
    (
        "Executive Office",
        "Office Space",
        15.0,
        12.0,
        9.0,
        35,
        [0.4, 0.35, 0.3],
        40.0,
        "Private executive office",
    ),
    (
        "Recording Studio",
        "Specialized Space",
        25.0,
        18.0,
        12.0,
        20,
        [0.3, 0.25, 0.2],
        25.0,
        "Professional recording studio",
    ),
    (
        "Open Office Area",
        "Work Space",
        50.0,
        40.0,
        9.0,
        40,
        [0.5, 0.45, 0.4],
        45.0,
        "Open plan office space",
    ),
    (
        "Quiet Room",
        "Specialized Space",
        12.0,
        10.0,
        8.0,
        25,
        [0.2, 0.15, 0.1],
        30.0,
        "Sound isolated quiet room",
    ),
];

pub fn materials() -> Vec<AcousticMaterial> {
    MATERIALS
        .iter()
        .map(|m| AcousticMaterial {
            material_name: m.name.to_string(),
            material_type: m.kind.to_string(),
            nrc_single_value: m.nrc,
            nrc_bands: m.bands,
            stc_rating: m.stc,
            iic_rating: m.iic,
            cost_per_sqft: m.cost,
            notes: Some(format!("Sample {} material", m.kind)),
        })
        .collect()
}

pub fn equipment() -> Vec<EquipmentItem> {
    EQUIPMENT
        .iter()
        .map(|(name, kind, sound_power)| EquipmentItem {
            equipment_name: name.to_string(),
            equipment_type: kind.to_string(),
            sound_power: *sound_power,
            notes: Some(format!("Sample {kind} equipment")),
        })
        .collect()
}

pub fn spaces() -> Vec<EquipmentSpace> {
    SPACES
        .iter()
        .map(
            |&(name, kind, length, width, height, nc, [rt500, rt1000, rt2000], noise, notes)| {
                EquipmentSpace {
                    space_name: name.to_string(),
                    space_type: kind.to_string(),
                    length_ft: length,
                    width_ft: width,
                    height_ft: height,
                    nc_requirement: Some(nc),
                    rt60_500hz: Some(rt500),
                    rt60_1000hz: Some(rt1000),
                    rt60_2000hz: Some(rt2000),
                    background_noise_dba: Some(noise),
                    notes: Some(notes.to_string()),
                }
            },
        )
        .collect()
}

/// One message of the scripted conference-room discussion.
pub struct ThreadMessage {
    pub day_offset: i64,
    pub sender: &'static str,
    pub recipient: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
}

pub const CONFERENCE_ROOM_THREAD: [ThreadMessage; 9] = [
    ThreadMessage {
        day_offset: 5,
        sender: "sarah.johnson@acoustics.com",
        recipient: "design.team@company.com",
        subject: "Initial Acoustic Material Recommendation - Conference Room Treatment",
        body: "Dear Design Team,\n\n\
Following the site assessment and acoustic modeling, we recommend Class A \
fabric panels with NRC 0.95 covering 60% of the wall area. Band values: \
125Hz 0.85, 250Hz 0.90, 500Hz 0.95, 1000Hz 0.98, 2000Hz 0.95, 4000Hz 0.92.\n\n\
This reaches the RT60 target of 0.6 s and NC-30. Estimated installed cost is $18,500.\n\n\
Best regards,\nSarah Johnson\nSenior Acoustical Engineer",
    },
    ThreadMessage {
        day_offset: 7,
        sender: "mike.anderson@company.com",
        recipient: "sarah.johnson@acoustics.com",
        subject: "RE: Initial Acoustic Material Recommendation - Conference Room Treatment",
        body: "Hi Sarah,\n\n\
The panels read as too industrial for an executive client, 60% coverage is \
visually heavy, and the cost is above our $12,000 allocation. Could a mix of \
ceiling treatment and reduced wall coverage work? The client wants a warm, \
professional room rather than a studio feel.\n\n\
Best regards,\nMike Anderson\nLead Interior Designer",
    },
    ThreadMessage {
        day_offset: 8,
        sender: "sarah.johnson@acoustics.com",
        recipient: "mike.anderson@company.com",
        subject: "RE: Conference Room Treatment - Alternative Options",
        body: "Hi Mike,\n\n\
Option A: custom fabric-wrapped panels, NRC 0.88, 45% wall plus 30% ceiling, $14,200, RT60 0.65 s.\n\
Option B: perforated wood panels, premium ceiling tiles and acoustic art, $13,800, RT60 0.68 s.\n\
Both hold NC-30. Happy to walk through fabric samples this week.\n\n\
Best regards,\nSarah",
    },
    ThreadMessage {
        day_offset: 10,
        sender: "jennifer.clark@company.com",
        recipient: "sarah.johnson@acoustics.com",
        subject: "RE: Conference Room Treatment - Client Feedback",
        body: "Hi Sarah,\n\n\
The client approved Option A in charcoal gray (#C2847). Ceiling work has to \
avoid the recessed lighting grid, they would like subtle logo branding on the \
panels, and they asked us to confirm the fire rating. Completion moved up to March 15th.\n\n\
Best regards,\nJennifer Clark\nProject Manager",
    },
    ThreadMessage {
        day_offset: 12,
        sender: "sarah.johnson@acoustics.com",
        recipient: "jennifer.clark@company.com",
        subject: "UPDATED: Conference Room Acoustic Design - Final Specifications",
        body: "Hi Jennifer,\n\n\
Final specification: Class A charcoal panels at 45% wall coverage with a \
laser-perforated logo, ceiling tiles only where the lighting allows. \
Predicted RT60 0.64 s, NC-29. Cost $14,400 ($11,200 panels, $2,400 ceiling, \
$800 branding). Delivery March 12th.\n\n\
Best regards,\nSarah Johnson",
    },
    ThreadMessage {
        day_offset: 15,
        sender: "mike.anderson@company.com",
        recipient: "sarah.johnson@acoustics.com",
        subject: "RE: APPROVED - Conference Room Acoustic Design",
        body: "Hi Sarah,\n\n\
Approved at $14,400 for March 12th delivery; please start fabrication. The \
client would also like a two-page performance summary for their facilities team.\n\n\
Best regards,\nMike Anderson",
    },
    ThreadMessage {
        day_offset: 25,
        sender: "sarah.johnson@acoustics.com",
        recipient: "mike.anderson@company.com",
        subject: "Installation Update - Conference Room Acoustics",
        body: "Hi Mike,\n\n\
Installation finished March 11th, a day early, with no issues. Reverberation \
dropped noticeably and the logo detail came out well. Final testing is set \
for March 14th and the client walk-through for March 15th.\n\n\
Best regards,\nSarah",
    },
    ThreadMessage {
        day_offset: 30,
        sender: "sarah.johnson@acoustics.com",
        recipient: "project.team@company.com",
        subject: "FINAL REPORT - Conference Room Acoustic Performance Testing",
        body: "Dear Project Team,\n\n\
Measured RT60 is 0.62 s at 500Hz and 0.59 s at 1000Hz, NC-28 against a \
target of 30, STI 0.72. Delivered three days early at $14,400. The technical \
report with measurements and maintenance notes is attached.\n\n\
Best regards,\nSarah Johnson\nSenior Acoustical Engineer",
    },
    ThreadMessage {
        day_offset: 35,
        sender: "jennifer.clark@company.com",
        recipient: "sarah.johnson@acoustics.com",
        subject: "Client Testimonial & Future Projects",
        body: "Hi Sarah,\n\n\
The client reports far clearer video calls and has asked for proposals on \
the executive boardroom, open office treatment, reception sound masking and \
the training room. Can we plan those next week?\n\n\
Best regards,\nJennifer Clark\nProject Manager",
    },
];

/// General project email templates; `{week}` and `{quarter}` get filled in.
pub const GENERAL_EMAIL_TEMPLATES: [(&str, &str); 4] = [
    (
        "Weekly Status Meeting - {week}",
        "Hello team,\n\nReminder: weekly status meeting tomorrow at 2:00 PM. Bring your updates and open issues.\n\nBest regards,\nProject Management",
    ),
    (
        "Budget Review - Q{quarter}",
        "Dear team,\n\nPlease review the attached quarterly budget summary before we discuss variances and upcoming expenses.\n\nThank you,\nFinance Team",
    ),
    (
        "Site Visit Scheduled",
        "Hi everyone,\n\nA site visit is scheduled for next Tuesday. Let me know if you need to join.\n\nBest regards,\nProject Manager",
    ),
    (
        "Client Feedback Session",
        "Dear team,\n\nThe client asked for a progress feedback session. Please prepare your sections.\n\nThank you,\nProject Lead",
    ),
];
