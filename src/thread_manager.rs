use log::info;
pub type TaskID = i32;

pub trait SteppableTask: Send + 'static {
    /// Runs one unit of work. Returning `false` ends the task.
    fn step(&mut self) -> bool;

    /// Called once on the task's thread after its last step, whether it
    /// ended on its own or was stopped.
    fn finish(&mut self) {}
}

pub struct ThreadManager {
    current_task_id: TaskID,
    tasks: std::collections::HashMap<TaskID, ManagedTask>,
}

impl ThreadManager {
    #[must_use]
    pub fn new() -> Self {
        ThreadManager {
            current_task_id: 0,
            tasks: std::collections::HashMap::new(),
        }
    }

    /// Spawns `task` on a thread called `name`.
    ///
    /// A zero `period` steps the task back to back; otherwise steps start
    /// `period` apart.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread could not be spawned.
    pub fn add_task<T>(
        &mut self,
        name: &str,
        task: T,
        period: std::time::Duration,
    ) -> std::io::Result<TaskID>
    where
        T: SteppableTask,
    {
        let id = self.current_task_id;

        let (stop_sender, stop_receiver) = crossbeam_channel::bounded::<()>(1);

        let task_name = name.to_string();
        let handle = std::thread::Builder::new()
            .name(task_name.clone())
            .spawn(move || {
                info!("ThreadManager: task '{task_name}' started.");
                let mut task = task;
                if period.is_zero() {
                    run_task_continuously(&mut task, &stop_receiver);
                } else {
                    run_task_with_period(&mut task, period, &stop_receiver);
                }
                task.finish();
                info!("ThreadManager: task '{task_name}' finished.");
            })?;
        self.tasks.insert(
            id,
            ManagedTask {
                handle,
                stop_sender,
            },
        );
        self.current_task_id += 1;
        Ok(id)
    }

    pub fn stop_all_tasks(&self) {
        info!("ThreadManager: Signaling all tasks to stop...");
        for task in self.tasks.values() {
            let _ = task.stop_sender.try_send(());
        }
    }

    pub fn wait_on_task_finish(&mut self, task_id: TaskID) {
        if let Some(task) = self.tasks.remove(&task_id) {
            if task.handle.join().is_err() {
                log::error!("ThreadManager: task {task_id} panicked.");
            }
        }
    }
}

impl Default for ThreadManager {
    fn default() -> Self {
        ThreadManager::new()
    }
}

fn run_task_continuously<T: SteppableTask>(
    task: &mut T,
    stop_receiver: &crossbeam_channel::Receiver<()>,
) {
    loop {
        match stop_receiver.try_recv() {
            Ok(()) | Err(crossbeam_channel::TryRecvError::Disconnected) => break,
            Err(crossbeam_channel::TryRecvError::Empty) => {}
        }

        if !task.step() {
            break;
        }

        std::thread::yield_now();
    }
}

fn run_task_with_period<T: SteppableTask>(
    task: &mut T,
    period: std::time::Duration,
    stop_receiver: &crossbeam_channel::Receiver<()>,
) {
    let mut next_run = std::time::Instant::now();
    loop {
        if !task.step() {
            break;
        }

        next_run += period;
        let now = std::time::Instant::now();

        if next_run > now {
            match stop_receiver.recv_timeout(next_run - now) {
                Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            }
        } else {
            // Lagging behind: restart the schedule from now.
            next_run = now;

            if let Ok(()) = stop_receiver.try_recv() {
                break;
            }
        }
    }
}
struct ManagedTask {
    handle: std::thread::JoinHandle<()>,
    stop_sender: crossbeam_channel::Sender<()>,
}
#[cfg(test)]
mod tests {
    use super::{SteppableTask, ThreadManager};

    // Counts its steps and stops itself at `limit`.
    struct CountingTask {
        count: usize,
        limit: usize,
        sender: std::sync::mpsc::Sender<usize>,
        finished: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }

    impl CountingTask {
        fn new(limit: usize, sender: std::sync::mpsc::Sender<usize>) -> Self {
            Self {
                count: 0,
                limit,
                sender,
                finished: std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false)),
            }
        }
    }

    impl SteppableTask for CountingTask {
        fn step(&mut self) -> bool {
            self.count += 1;
            self.sender.send(self.count).unwrap();
            self.count < self.limit
        }

        fn finish(&mut self) {
            self.finished
                .store(true, std::sync::atomic::Ordering::SeqCst);
        }
    }

    // Runs until stopped from outside.
    struct LoopingTask {
        finished: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }

    impl SteppableTask for LoopingTask {
        fn step(&mut self) -> bool {
            true
        }

        fn finish(&mut self) {
            self.finished
                .store(true, std::sync::atomic::Ordering::SeqCst);
        }
    }

    #[test]
    fn when_multiple_tasks_added_then_all_tasks_completed() {
        let mut manager = ThreadManager::new();
        let (counter_1_sender, counter_1_receiver) = std::sync::mpsc::channel();
        let (counter_2_sender, counter_2_receiver) = std::sync::mpsc::channel();

        let task_1 = CountingTask::new(5, counter_1_sender);
        let task_2 = CountingTask::new(10, counter_2_sender);
        let task_1_id = manager
            .add_task("counter-1", task_1, std::time::Duration::from_millis(5))
            .unwrap();
        let task_2_id = manager
            .add_task("counter-2", task_2, std::time::Duration::ZERO)
            .unwrap();

        manager.wait_on_task_finish(task_2_id);
        manager.wait_on_task_finish(task_1_id);

        assert!(manager.tasks.is_empty());
        assert_eq!(counter_1_receiver.try_iter().count(), 5);
        assert_eq!(counter_2_receiver.try_iter().count(), 10);
    }

    #[test]
    fn when_task_ends_on_its_own_then_finish_hook_runs() {
        let mut manager = ThreadManager::new();
        let (sender, _receiver) = std::sync::mpsc::channel();
        let task = CountingTask::new(3, sender);
        let finished = task.finished.clone();

        let id = manager
            .add_task("counter", task, std::time::Duration::from_millis(1))
            .unwrap();
        manager.wait_on_task_finish(id);

        assert!(finished.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn when_stop_all_tasks_is_called_then_looping_tasks_finish() {
        let mut manager = ThreadManager::new();
        let periodic_finished = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let continuous_finished = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));

        let periodic_id = manager
            .add_task(
                "periodic",
                LoopingTask {
                    finished: periodic_finished.clone(),
                },
                std::time::Duration::from_millis(20),
            )
            .unwrap();
        let continuous_id = manager
            .add_task(
                "continuous",
                LoopingTask {
                    finished: continuous_finished.clone(),
                },
                std::time::Duration::ZERO,
            )
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(50));
        manager.stop_all_tasks();
        manager.wait_on_task_finish(periodic_id);
        manager.wait_on_task_finish(continuous_id);

        assert!(manager.tasks.is_empty());
        assert!(periodic_finished.load(std::sync::atomic::Ordering::SeqCst));
        assert!(continuous_finished.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn when_wait_on_task_finish_called_then_task_id_removed() {
        let mut manager = ThreadManager::new();
        let finished = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));

        let task_id1 = manager
            .add_task(
                "looper-1",
                LoopingTask {
                    finished: finished.clone(),
                },
                std::time::Duration::from_millis(100),
            )
            .unwrap();
        let task_id2 = manager
            .add_task(
                "looper-2",
                LoopingTask {
                    finished: finished.clone(),
                },
                std::time::Duration::from_millis(100),
            )
            .unwrap();

        assert_eq!(manager.tasks.len(), 2);

        manager.stop_all_tasks();
        manager.wait_on_task_finish(task_id1);

        assert_eq!(manager.tasks.len(), 1);
        assert!(manager.tasks.contains_key(&task_id2));

        manager.wait_on_task_finish(task_id2);
        assert!(manager.tasks.is_empty());
    }
}
