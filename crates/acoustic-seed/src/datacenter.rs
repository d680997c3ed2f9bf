//! The hand-authored data-center mitigation project.

use acoustic_common::{Error, Result};
use acoustic_db::records::{
    AcousticMaterial, AstmTest, Budget, DATE_FORMAT, Deliverable, Email, EquipmentItem,
    EquipmentSpace, Milestone, NewProject, TIMESTAMP_FORMAT,
};
use chrono::{NaiveDate, NaiveDateTime};

pub const PROJECT_NAME: &str = "Data Center Acoustic Mitigation";

/// Every row belonging to the data-center project.
#[derive(Debug, Clone)]
pub struct DatacenterProject {
    pub project: NewProject,
    pub budget: Budget,
    pub astm_tests: Vec<AstmTest>,
    pub materials: Vec<AcousticMaterial>,
    pub spaces: Vec<EquipmentSpace>,
    pub equipment: Vec<EquipmentItem>,
    pub emails: Vec<Email>,
    pub deliverables: Vec<Deliverable>,
    pub milestones: Vec<Milestone>,
}

fn day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| Error::Seed(format!("bad date '{s}': {e}")))
}

fn maybe_day(s: Option<&str>) -> Result<Option<NaiveDate>> {
    s.map(day).transpose()
}

fn timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| Error::Seed(format!("bad timestamp '{s}': {e}")))
}

impl DatacenterProject {
    pub fn build() -> Result<Self> {
        let project = NewProject {
            project_name: PROJECT_NAME.to_string(),
            client_name: "CloudTech Solutions".to_string(),
            start_date: day("2024-03-15")?,
            end_date: day("2024-12-15")?,
            status: "In Progress".to_string(),
            percent_complete: 45,
        };

        let budget = Budget {
            total_budget: 485_000.0,
            spent_amount: 218_250.0,
            last_updated: day("2024-06-15")?,
        };

        let astm_tests = [
            (
                "ASTM E90 - Server Room Wall Assembly",
                "2024-04-20",
                "Sound Transmission Loss",
                52.0,
                "STC",
                "Wall assembly test for server room isolation",
            ),
            (
                "ASTM C423 - Acoustic Ceiling Tiles",
                "2024-05-05",
                "Sound Absorption",
                0.85,
                "NRC",
                "Ceiling treatment absorption testing",
            ),
            (
                "ASTM E492 - Raised Floor System",
                "2024-05-12",
                "Impact Insulation",
                58.0,
                "IIC",
                "Impact isolation for raised floor system",
            ),
            (
                "ASTM E336 - Server Cabinet Enclosure",
                "2024-05-25",
                "Sound Transmission Loss",
                35.0,
                "STC",
                "Cabinet enclosure sound isolation test",
            ),
            (
                "ASTM E1050 - Background Noise Survey",
                "2024-06-01",
                "Noise Level",
                42.0,
                "dBA",
                "Ambient noise measurement in data center",
            ),
        ]
        .into_iter()
        .map(|(name, date, kind, value, unit, notes)| -> Result<AstmTest> {
            Ok(AstmTest {
                test_name: name.to_string(),
                test_date: day(date)?,
                test_type: kind.to_string(),
                result_value: Some(value),
                result_unit: Some(unit.to_string()),
                notes: Some(notes.to_string()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

        let bands = |b: [f64; 6]| b.map(Some);
        let materials = [
            (
                "High-Performance Acoustic Panels",
                "Wall Treatment",
                Some(0.90),
                bands([0.85, 0.88, 0.90, 0.92, 0.90, 0.88]),
                None,
                None,
                24.50,
                "Fire-rated panels for server room walls",
            ),
            (
                "Perforated Metal Ceiling System",
                "Ceiling Treatment",
                Some(0.75),
                bands([0.70, 0.72, 0.75, 0.78, 0.75, 0.72]),
                None,
                None,
                18.75,
                "Perforated metal with acoustic backing",
            ),
            (
                "Vibration Isolation Pads",
                "Equipment Mounting",
                None,
                [None; 6],
                None,
                None,
                45.00,
                "Heavy-duty isolation pads for server racks",
            ),
            (
                "Acoustic Enclosure Panels",
                "Equipment Enclosure",
                Some(0.65),
                bands([0.60, 0.63, 0.65, 0.68, 0.65, 0.62]),
                Some(48),
                None,
                32.25,
                "Modular panels for equipment enclosures",
            ),
            (
                "Sound-Absorbing Duct Liner",
                "HVAC Treatment",
                Some(0.80),
                bands([0.75, 0.78, 0.80, 0.82, 0.80, 0.78]),
                None,
                None,
                8.95,
                "Duct liner for HVAC noise control",
            ),
            (
                "Raised Floor Underlayment",
                "Floor Treatment",
                None,
                [None; 6],
                Some(45),
                Some(55),
                12.50,
                "Underlayment for raised floor system",
            ),
        ]
        .into_iter()
        .map(|(name, kind, nrc, nrc_bands, stc, iic, cost, notes)| AcousticMaterial {
            material_name: name.to_string(),
            material_type: kind.to_string(),
            nrc_single_value: nrc,
            nrc_bands,
            stc_rating: stc,
            iic_rating: iic,
            cost_per_sqft: cost,
            notes: Some(notes.to_string()),
        })
        .collect();

        let spaces = [
            (
                "Server Room A",
                "Critical Space",
                40.0,
                30.0,
                12.0,
                35,
                0.8,
                0.7,
                0.6,
                48.0,
                "Primary server room with 200 racks",
            ),
            (
                "Server Room B",
                "Critical Space",
                35.0,
                25.0,
                12.0,
                35,
                0.8,
                0.7,
                0.6,
                47.0,
                "Secondary server room with 150 racks",
            ),
            (
                "Network Operations Center",
                "Control Room",
                25.0,
                20.0,
                10.0,
                40,
                0.6,
                0.5,
                0.4,
                45.0,
                "NOC with 24/7 monitoring staff",
            ),
            (
                "UPS Room",
                "Mechanical Space",
                20.0,
                15.0,
                12.0,
                50,
                1.2,
                1.0,
                0.8,
                65.0,
                "Uninterruptible power supply equipment",
            ),
            (
                "Cooling Equipment Room",
                "Mechanical Space",
                30.0,
                20.0,
                14.0,
                55,
                1.5,
                1.2,
                1.0,
                72.0,
                "HVAC cooling equipment",
            ),
            (
                "Electrical Switchgear Room",
                "Mechanical Space",
                18.0,
                12.0,
                10.0,
                45,
                1.0,
                0.8,
                0.6,
                58.0,
                "Main electrical distribution",
            ),
            (
                "Generator Room",
                "Mechanical Space",
                25.0,
                18.0,
                15.0,
                60,
                2.0,
                1.8,
                1.5,
                85.0,
                "Backup generator equipment",
            ),
            (
                "Office Space",
                "Administrative",
                30.0,
                25.0,
                9.0,
                35,
                0.5,
                0.4,
                0.3,
                40.0,
                "Administrative offices",
            ),
            (
                "Conference Room",
                "Meeting Space",
                20.0,
                15.0,
                9.0,
                30,
                0.6,
                0.5,
                0.4,
                35.0,
                "Meeting room for technical discussions",
            ),
        ]
        .into_iter()
        .map(|(name, kind, l, w, h, nc, rt500, rt1000, rt2000, noise, notes)| EquipmentSpace {
            space_name: name.to_string(),
            space_type: kind.to_string(),
            length_ft: l,
            width_ft: w,
            height_ft: h,
            nc_requirement: Some(nc),
            rt60_500hz: Some(rt500),
            rt60_1000hz: Some(rt1000),
            rt60_2000hz: Some(rt2000),
            background_noise_dba: Some(noise),
            notes: Some(notes.to_string()),
        })
        .collect();

        let equipment = [
            (
                "Precision Air Conditioning Unit",
                "HVAC",
                [78.0, 82.0, 85.0, 87.0, 85.0, 82.0, 78.0],
                "Main cooling unit for server room",
            ),
            (
                "Server Rack Cooling Fan",
                "Cooling",
                [65.0, 68.0, 70.0, 72.0, 70.0, 68.0, 65.0],
                "Individual rack cooling fans",
            ),
            (
                "UPS System",
                "Electrical",
                [72.0, 75.0, 78.0, 80.0, 78.0, 75.0, 72.0],
                "Uninterruptible power supply",
            ),
            (
                "Backup Generator",
                "Electrical",
                [90.0, 95.0, 98.0, 100.0, 98.0, 95.0, 90.0],
                "Emergency backup generator",
            ),
            (
                "Chiller System",
                "HVAC",
                [85.0, 88.0, 90.0, 92.0, 90.0, 88.0, 85.0],
                "Main chiller for cooling",
            ),
            (
                "Air Handling Unit",
                "HVAC",
                [80.0, 83.0, 85.0, 87.0, 85.0, 83.0, 80.0],
                "Air distribution system",
            ),
            (
                "Transformer Bank",
                "Electrical",
                [75.0, 78.0, 80.0, 82.0, 80.0, 78.0, 75.0],
                "Power distribution transformer",
            ),
            (
                "Fire Suppression Compressor",
                "Safety",
                [70.0, 73.0, 75.0, 77.0, 75.0, 73.0, 70.0],
                "Fire suppression system compressor",
            ),
        ]
        .into_iter()
        .map(|(name, kind, sound_power, notes)| EquipmentItem {
            equipment_name: name.to_string(),
            equipment_type: kind.to_string(),
            sound_power,
            notes: Some(notes.to_string()),
        })
        .collect();

        let emails = [
            (
                "project.manager@cloudtech.com",
                "acoustics.team@consultingfirm.com",
                "Data Center Acoustic Requirements",
                "Hello team,\n\nOur acoustic requirements for the new facility are attached. \
The main concerns are server room isolation (target NC-35), generator room \
sound control and staff comfort in the NOC.\n\nPlease send an initial assessment.\n\n\
Best regards,\nMark Thompson\nProject Manager",
                "2024-03-20 09:15:00",
            ),
            (
                "acoustics.team@consultingfirm.com",
                "project.manager@cloudtech.com",
                "RE: Data Center Acoustic Requirements",
                "Hi Mark,\n\nWe suggest starting with a survey of existing conditions, then \
enclosures for the loudest equipment and targeted treatment of the critical \
rooms. We will book a site visit for next week.\n\nBest,\nSarah Chen\nAcoustic Engineer",
                "2024-03-22 14:30:00",
            ),
            (
                "project.manager@cloudtech.com",
                "acoustics.team@consultingfirm.com",
                "Site Visit Feedback",
                "Sarah,\n\nThanks for yesterday's visit. Generator room isolation comes first, \
server room treatment is Phase 1 and NOC improvements are Phase 2. Can we go \
over the budget split this week?\n\nThanks,\nMark",
                "2024-04-15 11:45:00",
            ),
        ]
        .into_iter()
        .map(|(sender, recipient, subject, content, sent)| -> Result<Email> {
            Ok(Email {
                sender: sender.to_string(),
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                content: content.to_string(),
                sent_date: timestamp(sent)?,
                is_read: true,
            })
        })
        .collect::<Result<Vec<_>>>()?;

        let deliverables = [
            (
                "Acoustic Assessment Report",
                "Technical Report",
                "2024-04-30",
                Some("2024-04-28"),
                "Completed",
                "Initial site assessment and recommendations",
            ),
            (
                "Equipment Noise Control Specifications",
                "Technical Specification",
                "2024-05-15",
                Some("2024-05-12"),
                "Completed",
                "Detailed specs for equipment enclosures",
            ),
            (
                "Room Treatment Design Package",
                "Design Package",
                "2024-06-01",
                Some("2024-06-03"),
                "Completed",
                "Acoustic treatment designs for all spaces",
            ),
            (
                "Installation Supervision Report",
                "Progress Report",
                "2024-07-15",
                None,
                "In Progress",
                "Ongoing installation oversight",
            ),
            (
                "Final Commissioning Report",
                "Technical Report",
                "2024-12-01",
                None,
                "Pending",
                "Final testing and commissioning results",
            ),
            (
                "Operation and Maintenance Manual",
                "Documentation",
                "2024-12-15",
                None,
                "Pending",
                "User manual for acoustic systems",
            ),
        ]
        .into_iter()
        .map(|(name, kind, due, submitted, status, notes)| -> Result<Deliverable> {
            Ok(Deliverable {
                deliverable_name: name.to_string(),
                deliverable_type: kind.to_string(),
                due_date: day(due)?,
                submission_date: maybe_day(submitted)?,
                status: status.to_string(),
                notes: Some(notes.to_string()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

        let milestones = [
            (
                "Project Kickoff",
                "Project Management",
                "2024-03-15",
                Some("2024-03-15"),
                "Completed",
                "Initial project meeting and planning",
            ),
            (
                "Site Assessment Complete",
                "Technical",
                "2024-04-30",
                Some("2024-04-28"),
                "Completed",
                "Comprehensive acoustic assessment finished",
            ),
            (
                "Design Phase Complete",
                "Design",
                "2024-06-01",
                Some("2024-06-03"),
                "Completed",
                "All design packages approved",
            ),
            (
                "Equipment Installation Start",
                "Installation",
                "2024-07-01",
                Some("2024-07-01"),
                "Completed",
                "Installation phase begins",
            ),
            (
                "Phase 1 Installation Complete",
                "Installation",
                "2024-09-15",
                None,
                "In Progress",
                "Server room treatments installed",
            ),
            (
                "Phase 2 Installation Complete",
                "Installation",
                "2024-11-01",
                None,
                "Pending",
                "Mechanical room treatments installed",
            ),
            (
                "Final Testing",
                "Testing",
                "2024-11-15",
                None,
                "Pending",
                "Commissioning and performance testing",
            ),
            (
                "Project Completion",
                "Project Management",
                "2024-12-15",
                None,
                "Pending",
                "Final project delivery and closeout",
            ),
        ]
        .into_iter()
        .map(|(name, kind, planned, actual, status, notes)| -> Result<Milestone> {
            Ok(Milestone {
                milestone_name: name.to_string(),
                milestone_type: kind.to_string(),
                planned_date: day(planned)?,
                actual_date: maybe_day(actual)?,
                status: status.to_string(),
                notes: Some(notes.to_string()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            project,
            budget,
            astm_tests,
            materials,
            spaces,
            equipment,
            emails,
            deliverables,
            milestones,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_every_section() {
        let dc = DatacenterProject::build().unwrap();
        assert_eq!(dc.project.project_name, PROJECT_NAME);
        assert_eq!(dc.budget.remaining_amount(), 266_750.0);
        assert_eq!(dc.astm_tests.len(), 5);
        assert_eq!(dc.materials.len(), 6);
        assert_eq!(dc.spaces.len(), 9);
        assert_eq!(dc.equipment.len(), 8);
        assert_eq!(dc.emails.len(), 3);
        assert_eq!(dc.deliverables.len(), 6);
        assert_eq!(dc.milestones.len(), 8);
    }

    #[test]
    fn pending_work_has_no_completion_date() {
        let dc = DatacenterProject::build().unwrap();
        for d in &dc.deliverables {
            assert_eq!(
                d.submission_date.is_some(),
                d.status == "Completed",
                "{}",
                d.deliverable_name
            );
        }
        for m in &dc.milestones {
            assert_eq!(m.actual_date.is_some(), m.status == "Completed", "{}", m.milestone_name);
        }
    }

    #[test]
    fn server_room_a_is_the_largest_space() {
        let dc = DatacenterProject::build().unwrap();
        let largest = dc
            .spaces
            .iter()
            .max_by(|a, b| a.volume_cubic_ft().total_cmp(&b.volume_cubic_ft()))
            .unwrap();
        assert_eq!(largest.space_name, "Server Room A");
        assert_eq!(largest.volume_cubic_ft(), 14_400.0);
    }
}
