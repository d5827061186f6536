//! The matrix view's visualization contract.
//!
//! A [`Visualization`] lays out a student sequence and reports back on a
//! channel: one [`PlotEvent::DataReady`] when the layout is computed, and a
//! [`PlotEvent::NavigationRequested`] whenever the user picks a plotted
//! student. The refresh is finished once the visualization drops its
//! sender.

use std::future::Future;

use cv_core::Student;
use tokio::sync::mpsc;

/// Name of the measure plotted on the y axis by [`ScatterplotPartitioner`].
pub const GPA_MEASURE: &str = "cumulative_gpa";

/// Sender a visualization reports on.
pub type PlotSender = mpsc::UnboundedSender<PlotEvent>;

/// Something that happened in the scatterplot.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotEvent {
    /// The user picked the student with this uid.
    NavigationRequested(String),
    /// The layout is computed.
    DataReady {
        /// Measure used for the y axis.
        measure: String,
        /// Students left out for lacking a measure, in input order.
        excluded: Vec<Student>,
    },
}

/// Lays out students for the matrix view.
pub trait Visualization: Send + Sync + 'static {
    /// Lays out `students` and reports on `events`.
    fn refresh(
        &self,
        students: Vec<Student>,
        events: PlotSender,
    ) -> impl Future<Output = ()> + Send;
}

/// One plotted point.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    /// Student identifier.
    pub sid: String,
    /// Campus uid used for navigation, if known.
    pub uid: Option<String>,
    /// Cumulative units (x axis).
    pub units: f64,
    /// Cumulative GPA (y axis).
    pub gpa: f64,
}

/// Plotted and excluded students.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Students with both measures.
    pub plotted: Vec<PlotPoint>,
    /// Students missing GPA or units.
    pub excluded: Vec<Student>,
}

impl Partition {
    /// Splits `students` into plotted and excluded, keeping input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cv_core::Student;
    /// use cv_view::plot::Partition;
    ///
    /// let mut plotted = Student::new("1", "Ann", "Ito");
    /// plotted.cumulative_gpa = Some(3.1);
    /// plotted.cumulative_units = Some(42.0);
    /// let missing = Student::new("2", "Bo", "Anders");
    ///
    /// let partition = Partition::of(&[plotted, missing]);
    /// assert_eq!(partition.plotted.len(), 1);
    /// assert_eq!(partition.excluded[0].sid, "2");
    /// ```
    #[must_use]
    pub fn of(students: &[Student]) -> Self {
        let mut partition = Self::default();
        for student in students {
            match (student.cumulative_gpa, student.cumulative_units) {
                (Some(gpa), Some(units)) => partition.plotted.push(PlotPoint {
                    sid: student.sid.clone(),
                    uid: student.uid.clone(),
                    units,
                    gpa,
                }),
                _ => partition.excluded.push(student.clone()),
            }
        }
        partition
    }
}

/// Default visualization: GPA against units, no rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScatterplotPartitioner;

impl Visualization for ScatterplotPartitioner {
    async fn refresh(&self, students: Vec<Student>, events: PlotSender) {
        let partition = Partition::of(&students);
        tracing::debug!(
            plotted = partition.plotted.len(),
            excluded = partition.excluded.len(),
            "scatterplot laid out"
        );
        let ready = PlotEvent::DataReady {
            measure: GPA_MEASURE.to_owned(),
            excluded: partition.excluded,
        };
        if events.send(ready).is_err() {
            tracing::debug!("plot receiver dropped before data was ready");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(sid: &str, gpa: Option<f64>, units: Option<f64>) -> Student {
        let mut student = Student::new(sid, "F", "L");
        student.cumulative_gpa = gpa;
        student.cumulative_units = units;
        student
    }

    #[test]
    fn test_partition_keeps_order() {
        let students = [
            student("1", None, Some(10.0)),
            student("2", Some(3.0), Some(20.0)),
            student("3", Some(2.0), None),
            student("4", Some(3.9), Some(100.0)),
        ];
        let partition = Partition::of(&students);
        let plotted: Vec<&str> = partition.plotted.iter().map(|p| p.sid.as_str()).collect();
        let excluded: Vec<&str> = partition.excluded.iter().map(|s| s.sid.as_str()).collect();
        assert_eq!(plotted, ["2", "4"]);
        assert_eq!(excluded, ["1", "3"]);
    }

    #[tokio::test]
    async fn test_partitioner_reports_data_ready() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        ScatterplotPartitioner
            .refresh(vec![student("1", None, None)], tx)
            .await;
        match rx.recv().await {
            Some(PlotEvent::DataReady { measure, excluded }) => {
                assert_eq!(measure, GPA_MEASURE);
                assert_eq!(excluded.len(), 1);
            }
            other => panic!("unexpected plot event: {other:?}"),
        }
        assert!(rx.recv().await.is_none());
    }
}
