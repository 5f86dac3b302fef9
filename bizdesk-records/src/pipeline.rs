//! Opportunities grouped into pipeline stages.

use serde::Serialize;

use crate::entities::Opportunity;

/// Pipeline stages, in board order.
pub const STAGES: [&str; 5] = ["New", "Qualified", "Proposal", "Won", "Lost"];

/// One column of the pipeline board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageColumn<'a> {
    pub stage: String,
    pub opportunities: Vec<&'a Opportunity>,
    pub total: f64,
}

/// Group opportunities by stage.
///
/// The standard stages are always present, even when empty. Opportunities in
/// any other stage get extra columns after them, in first-seen order.
pub fn pipeline(opportunities: &[Opportunity]) -> Vec<StageColumn<'_>> {
    let mut columns: Vec<StageColumn<'_>> = STAGES
        .iter()
        .map(|stage| StageColumn {
            stage: stage.to_string(),
            opportunities: Vec::new(),
            total: 0.0,
        })
        .collect();

    for opp in opportunities {
        let idx = match columns.iter().position(|c| c.stage == opp.stage) {
            Some(idx) => idx,
            None => {
                columns.push(StageColumn {
                    stage: opp.stage.clone(),
                    opportunities: Vec::new(),
                    total: 0.0,
                });
                columns.len() - 1
            }
        };
        columns[idx].opportunities.push(opp);
        columns[idx].total += opp.value;
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opp(name: &str, stage: &str, value: f64) -> Opportunity {
        Opportunity {
            name: name.into(),
            stage: stage.into(),
            value,
            ..Opportunity::default()
        }
    }

    #[test]
    fn stages_in_board_order_with_totals() {
        let opps = vec![
            opp("Acme Deal", "New", 50000.0),
            opp("Delta Sale", "Won", 100000.0),
            opp("Beta Project", "Qualified", 20000.0),
            opp("Zeta Extra", "New", 5000.0),
        ];
        let board = pipeline(&opps);

        let stages: Vec<_> = board.iter().map(|c| c.stage.as_str()).collect();
        assert_eq!(stages, STAGES.to_vec());
        assert_eq!(board[0].total, 55000.0);
        assert_eq!(board[0].opportunities.len(), 2);
        assert!(board[2].opportunities.is_empty());
        assert_eq!(board[3].total, 100000.0);
    }

    #[test]
    fn unknown_stage_gets_trailing_column() {
        let opps = vec![opp("Odd", "On Hold", 10.0)];
        let board = pipeline(&opps);
        assert_eq!(board.len(), 6);
        assert_eq!(board[5].stage, "On Hold");
        assert_eq!(board[5].total, 10.0);
    }
}
